//! Preference adapter over an external key-value store.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::domain::Theme;
use thiserror::Error;

use crate::document::Document;

pub const THEME_KEY: &str = "theme";
pub const LANGUAGE_KEY: &str = "language";
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PreferenceBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Process-local backend; contents vanish with the process.
#[derive(Default)]
pub struct MemoryPreferenceBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceBackend for MemoryPreferenceBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPreferenceBackend::new()))
    }

    pub async fn get(&self, key: &str, default: &str) -> Result<String, PreferenceError> {
        Ok(self
            .backend
            .get(key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.backend.set(key, value).await
    }

    /// Stored theme, falling back to the default for absent or unrecognized values.
    pub async fn theme(&self) -> Result<Theme, PreferenceError> {
        let raw = self.get(THEME_KEY, Theme::default().as_str()).await?;
        Ok(raw.parse().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring stored theme");
            Theme::default()
        }))
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        self.set(THEME_KEY, theme.as_str()).await
    }

    pub async fn language(&self) -> Result<String, PreferenceError> {
        self.get(LANGUAGE_KEY, DEFAULT_LANGUAGE).await
    }

    pub async fn set_language(&self, language: &str) -> Result<(), PreferenceError> {
        self.set(LANGUAGE_KEY, language).await
    }

    /// Writes `data-theme` on the root and persists the choice.
    pub async fn apply_theme(&self, document: &Document, theme: Theme) {
        let _ = document.set_attribute(document.root(), "data-theme", theme.as_str());
        if let Err(err) = self.set_theme(theme).await {
            tracing::warn!(error = %err, "failed to persist theme");
        }
    }

    /// Writes `lang` on the root and persists the choice.
    pub async fn apply_language(&self, document: &Document, language: &str) {
        let _ = document.set_attribute(document.root(), "lang", language);
        if let Err(err) = self.set_language(language).await {
            tracing::warn!(error = %err, "failed to persist language");
        }
    }

    /// Loads theme and language (defaults when absent or unreadable) and applies both.
    pub async fn load_and_apply(&self, document: &Document) {
        let theme = self.theme().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "theme unavailable; using default");
            Theme::default()
        });
        let language = self.language().await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "language unavailable; using default");
            DEFAULT_LANGUAGE.to_string()
        });
        tracing::info!(theme = %theme, language = %language, "applying user preferences");
        self.apply_theme(document, theme).await;
        self.apply_language(document, &language).await;
    }
}

#[cfg(test)]
#[path = "tests/preferences_tests.rs"]
mod tests;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interaction_core::{PreferenceBackend, PreferenceError};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

const MEMORY_URL: &str = "sqlite::memory:";

/// Preference backend persisted in a SQLite database.
#[derive(Clone)]
pub struct SqlitePreferenceStore {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPreference {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl SqlitePreferenceStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own empty database,
        // so an in-memory store keeps exactly one connection alive for good.
        let pool_options = if database_url.starts_with(MEMORY_URL) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open preference database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to migrate preference database")?;
        tracing::debug!(database_url, "preference store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn load(&self, key: &str) -> Result<Option<StoredPreference>> {
        let row = sqlx::query("SELECT key, value, updated_at FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read preference '{key}'"))?;
        row.as_ref().map(preference_from_row).transpose()
    }

    pub async fn store(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write preference '{key}'"))?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<StoredPreference>> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM preferences ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("failed to list preferences")?;
        rows.iter().map(preference_from_row).collect()
    }
}

#[async_trait]
impl PreferenceBackend for SqlitePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        self.load(key)
            .await
            .map(|stored| stored.map(|p| p.value))
            .map_err(|err| PreferenceError::Backend(format!("{err:#}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.store(key, value)
            .await
            .map_err(|err| PreferenceError::Backend(format!("{err:#}")))
    }
}

fn preference_from_row(row: &SqliteRow) -> Result<StoredPreference> {
    Ok(StoredPreference {
        key: row.try_get("key")?,
        value: row.try_get("value")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with(MEMORY_URL) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

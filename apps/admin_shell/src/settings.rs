use std::{fs, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use interaction_core::{
    ActionBackend, ActionKind, InteractionConfig, MissingBackend, SimulatedBackend,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "admin_shell.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub resize_debounce_ms: u64,
    pub notification_ttl_ms: u64,
    pub mobile_breakpoint: u32,
    pub save_throttle_ms: u64,
    pub simulate_failure: Vec<String>,
    pub speedup: u32,
    /// Run without an operation provider; every action fails as unavailable.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/preferences.db".into(),
            resize_debounce_ms: 250,
            notification_ttl_ms: 5000,
            mobile_breakpoint: 768,
            save_throttle_ms: 1000,
            simulate_failure: Vec::new(),
            speedup: 1,
            offline: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    database_url: Option<String>,
    resize_debounce_ms: Option<u64>,
    notification_ttl_ms: Option<u64>,
    mobile_breakpoint: Option<u32>,
    save_throttle_ms: Option<u64>,
    simulate_failure: Option<Vec<String>>,
    speedup: Option<u32>,
    offline: Option<bool>,
}

impl Settings {
    pub fn interaction_config(&self) -> InteractionConfig {
        InteractionConfig {
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            notification_ttl: Duration::from_millis(self.notification_ttl_ms),
            mobile_breakpoint: self.mobile_breakpoint,
            save_throttle: Duration::from_millis(self.save_throttle_ms),
        }
    }

    pub fn backend(&self) -> Arc<dyn ActionBackend> {
        if self.offline {
            tracing::warn!("offline mode: actions will report the provider as unavailable");
            return Arc::new(MissingBackend);
        }
        Arc::new(self.simulated_backend())
    }

    pub fn simulated_backend(&self) -> SimulatedBackend {
        self.simulate_failure
            .iter()
            .filter_map(|name| match name.parse::<ActionKind>() {
                Ok(kind) => Some(kind),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring simulate_failure entry");
                    None
                }
            })
            .fold(
                SimulatedBackend::new().with_speedup(self.speedup),
                SimulatedBackend::failing,
            )
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.database_url {
            self.database_url = v;
        }
        if let Some(v) = file_cfg.resize_debounce_ms {
            self.resize_debounce_ms = v;
        }
        if let Some(v) = file_cfg.notification_ttl_ms {
            self.notification_ttl_ms = v;
        }
        if let Some(v) = file_cfg.mobile_breakpoint {
            self.mobile_breakpoint = v;
        }
        if let Some(v) = file_cfg.save_throttle_ms {
            self.save_throttle_ms = v;
        }
        if let Some(v) = file_cfg.simulate_failure {
            self.simulate_failure = v;
        }
        if let Some(v) = file_cfg.speedup {
            self.speedup = v;
        }
        if let Some(v) = file_cfg.offline {
            self.offline = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = var("APP__DATABASE_URL") {
            self.database_url = v;
        }

        parse_env(&var, "APP__RESIZE_DEBOUNCE_MS", &mut self.resize_debounce_ms);
        parse_env(&var, "APP__NOTIFICATION_TTL_MS", &mut self.notification_ttl_ms);
        parse_env(&var, "APP__MOBILE_BREAKPOINT", &mut self.mobile_breakpoint);
        parse_env(&var, "APP__SAVE_THROTTLE_MS", &mut self.save_throttle_ms);
        parse_env(&var, "APP__SPEEDUP", &mut self.speedup);
        parse_env(&var, "APP__OFFLINE", &mut self.offline);

        if let Some(v) = var("APP__SIMULATE_FAILURE") {
            self.simulate_failure = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    if let Some(raw) = var(key) {
        match raw.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!(key, value = %raw, "ignoring unparsable setting"),
        }
    }
}

/// Defaults, then the optional TOML file, then `APP__*` environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    match fs::read_to_string(path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if config_path.is_some() => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;

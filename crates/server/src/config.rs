use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub body_limit_bytes: usize,
    pub max_sessions: usize,
    pub display_precision: u32,
    /// Pins the year shown in the first row instead of reading the clock.
    pub calendar_year: Option<i32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            body_limit_bytes: 256 * 1024,
            max_sessions: 10_000,
            display_precision: form_core::DEFAULT_PRECISION,
            calendar_year: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    body_limit_bytes: Option<usize>,
    max_sessions: Option<usize>,
    display_precision: Option<u32>,
    calendar_year: Option<i32>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file if present, then environment variables.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.body_limit_bytes {
            settings.body_limit_bytes = v;
        }
        if let Some(v) = file_cfg.max_sessions {
            settings.max_sessions = v;
        }
        if let Some(v) = file_cfg.display_precision {
            settings.display_precision = v;
        }
        if let Some(v) = file_cfg.calendar_year {
            settings.calendar_year = Some(v);
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = parsed_env(&env, "APP__BODY_LIMIT_BYTES") {
        settings.body_limit_bytes = v;
    }
    if let Some(v) = parsed_env(&env, "APP__MAX_SESSIONS") {
        settings.max_sessions = v;
    }
    if let Some(v) = parsed_env(&env, "APP__DISPLAY_PRECISION") {
        settings.display_precision = v;
    }
    if let Some(v) = parsed_env(&env, "APP__CALENDAR_YEAR") {
        settings.calendar_year = Some(v);
    }

    settings.max_sessions = settings.max_sessions.max(1);
    Ok(settings)
}

fn parsed_env<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

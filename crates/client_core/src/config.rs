use std::{collections::HashMap, fmt, fs, path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "playground.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStrategy {
    #[default]
    ContentReplace,
    IsolatedFrame,
}

impl PreviewStrategy {
    pub fn label(self) -> &'static str {
        match self {
            Self::ContentReplace => "Content replace",
            Self::IsolatedFrame => "Isolated frame",
        }
    }
}

impl fmt::Display for PreviewStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContentReplace => "content_replace",
            Self::IsolatedFrame => "isolated_frame",
        })
    }
}

impl FromStr for PreviewStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "content_replace" => Ok(Self::ContentReplace),
            "isolated_frame" => Ok(Self::IsolatedFrame),
            other => Err(format!("unknown preview strategy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub render_base_url: String,
    /// `None` means the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub request_timeout_ms: u64,
    pub preview_strategy: PreviewStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_base_url: "http://127.0.0.1:4321".into(),
            catalog_path: None,
            request_timeout_ms: 10_000,
            preview_strategy: PreviewStrategy::ContentReplace,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Defaults, then `playground.toml` in the working directory, then the
/// environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

pub fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!("ignoring unparsable {SETTINGS_FILE}");
        return;
    };

    if let Some(v) = file_cfg.get("render_base_url").and_then(toml::Value::as_str) {
        settings.render_base_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("catalog_path").and_then(toml::Value::as_str) {
        settings.catalog_path = Some(PathBuf::from(v));
    }
    if let Some(v) = file_cfg
        .get("request_timeout_ms")
        .and_then(toml::Value::as_integer)
    {
        if let Ok(ms) = u64::try_from(v) {
            settings.request_timeout_ms = ms;
        }
    }
    if let Some(v) = file_cfg.get("preview_strategy").and_then(toml::Value::as_str) {
        if let Ok(strategy) = v.parse() {
            settings.preview_strategy = strategy;
        }
    }
}

pub fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("PLAYGROUND_RENDER_URL") {
        settings.render_base_url = v;
    }
    if let Some(v) = var("APP__RENDER_BASE_URL") {
        settings.render_base_url = v;
    }

    if let Some(v) = var("PLAYGROUND_CATALOG") {
        settings.catalog_path = Some(PathBuf::from(v));
    }
    if let Some(v) = var("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v));
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_ms = parsed;
        }
    }

    if let Some(v) = var("APP__PREVIEW_STRATEGY") {
        if let Ok(strategy) = v.parse() {
            settings.preview_strategy = strategy;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

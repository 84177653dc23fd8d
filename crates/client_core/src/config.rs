use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://cafeteria-rate-app.asmasoft.uz/rating";
pub const DEFAULT_CONFIRMATION_WINDOW: Duration = Duration::from_millis(3500);
pub const SETTINGS_FILE: &str = "survey.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: Url,
    pub confirmation_window: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            confirmation_window: DEFAULT_CONFIRMATION_WINDOW,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    confirmation_ms: Option<u64>,
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

/// Defaults, then `survey.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match read_file_settings(path) {
        Ok(Some(file_cfg)) => apply_file_settings(&mut settings, file_cfg),
        Ok(None) => {}
        Err(error) => warn!(%error, "ignoring unreadable settings file"),
    }

    for name in ["SURVEY_ENDPOINT", "APP__ENDPOINT"] {
        if let Some(raw) = env(name) {
            set_endpoint(&mut settings, &raw, name);
        }
    }
    for name in ["SURVEY_CONFIRMATION_MS", "APP__CONFIRMATION_MS"] {
        if let Some(raw) = env(name) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => settings.confirmation_window = Duration::from_millis(ms),
                Err(error) => {
                    warn!(%error, variable = name, value = %raw, "ignoring invalid confirmation window")
                }
            }
        }
    }

    settings
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let parsed = toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(endpoint) = file_cfg.endpoint {
        set_endpoint(settings, &endpoint, SETTINGS_FILE);
    }
    if let Some(ms) = file_cfg.confirmation_ms {
        settings.confirmation_window = Duration::from_millis(ms);
    }
}

/// Applies an endpoint override; anything that is not an http(s) URL is ignored.
pub fn set_endpoint(settings: &mut Settings, raw: &str, source: &str) -> bool {
    match parse_endpoint(raw) {
        Some(endpoint) => {
            settings.endpoint = endpoint;
            true
        }
        None => {
            warn!(source, value = raw, "ignoring invalid endpoint");
            false
        }
    }
}

fn parse_endpoint(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

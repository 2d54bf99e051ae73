use std::{fs, path::Path};

use anyhow::Context;
use client_core::{DEFAULT_API_BASE_URL, DEFAULT_DECK_COUNT};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "deck_viewer.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub deck_count: u32,
    pub window_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            deck_count: DEFAULT_DECK_COUNT,
            window_title: "Deck of Cards".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    deck_count: Option<u32>,
    window_title: Option<String>,
}

impl Settings {
    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.deck_count {
            self.deck_count = v;
        }
        if let Some(v) = file_cfg.window_title {
            self.window_title = v;
        }
    }

    /// Later names win, so `APP__*` overrides the short form.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for name in ["DECK_API_BASE_URL", "APP__API_BASE_URL"] {
            if let Some(v) = lookup(name).filter(|v| !v.trim().is_empty()) {
                self.api_base_url = v;
            }
        }

        if let Some(v) = lookup("APP__DECK_COUNT") {
            match v.trim().parse::<u32>() {
                Ok(parsed) if parsed > 0 => self.deck_count = parsed,
                _ => tracing::warn!(value = %v, "ignoring invalid APP__DECK_COUNT"),
            }
        }
    }
}

fn parse_file_settings(raw: &str) -> anyhow::Result<FileSettings> {
    toml::from_str(raw).context("invalid deck viewer config")
}

/// Defaults, then the optional config file, then environment overrides.
/// A missing file is not an error; an unreadable one is logged and skipped.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match parse_file_settings(&raw) {
            Ok(file_cfg) => settings.apply_file(file_cfg),
            Err(err) => tracing::warn!(
                path = %config_path.display(),
                "skipping config file: {err:#}"
            ),
        }
    }

    settings.apply_env(|name| std::env::var(name).ok());
    settings
}

//! # Configuration
//!
//! Two kinds of configuration live here:
//!
//! - [`Settings`]: optional TOML file tuning the analytics endpoint, logging
//!   and storage locations. Every field has a default, so a missing or partial
//!   file is fine.
//! - [`StoragePaths`]: the resolved directories for the consent document and
//!   the game history. Passed explicitly into the stores instead of being read
//!   from process-wide state, which lets tests point everything at a temp dir.
//!
//! The per-user analytics consent flag is handled by [`consent`].
//!
//! ## Settings file format
//!
//! ```toml
//! [analytics]
//! url = "https://nice.runasp.net/Analytics/HelloWorld"
//! timeout_seconds = 10
//!
//! [logging]
//! level = "warn"
//! # file = "guessing-game.log"
//!
//! [paths]
//! # config_dir = "/home/me/.config/guessing-game"
//! # data_dir = "/home/me/.local/share/guessing-game"
//! ```
//!
//! ## Path precedence
//!
//! CLI flag > environment variable > `[paths]` in the settings file > platform default.

pub mod consent;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory name used under the platform config/data roots.
pub const APP_DIR: &str = "guessing-game";
/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";
/// Consent document name inside the config directory.
pub const CONSENT_FILE: &str = "config.json";
/// History document name inside the data directory.
pub const HISTORY_FILE: &str = "game_stats.json";

pub const DEFAULT_ANALYTICS_URL: &str = "https://nice.runasp.net/Analytics/HelloWorld";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Endpoint hit once per won game when the player consented
    #[serde(default = "default_analytics_url")]
    pub url: String,
    /// Upper bound for the whole request, body included
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_analytics_url() -> String {
    DEFAULT_ANALYTICS_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            url: default_analytics_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when no `-v` flag is given (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read settings file {}: {}", path.display(), e))?;

        let settings: Settings = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse settings file {}: {}", path.display(), e))?;

        Ok(settings)
    }

    /// Write a settings file populated with defaults, creating its directory.
    pub async fn create_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Settings::default())
            .map_err(|e| anyhow!("Failed to serialize default settings: {}", e))?;

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await?;
            }
        }
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write settings file {}: {}", path.display(), e))?;

        Ok(())
    }
}

/// Where the consent and history documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl StoragePaths {
    pub fn new(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Combine CLI/env values with settings overrides, falling back to the
    /// platform defaults.
    pub fn resolve(
        config_dir: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        settings: &PathSettings,
    ) -> Self {
        Self {
            config_dir: config_dir
                .or_else(|| settings.config_dir.clone())
                .unwrap_or_else(default_config_dir),
            data_dir: data_dir
                .or_else(|| settings.data_dir.clone())
                .unwrap_or_else(default_data_dir),
        }
    }

    pub fn consent_file(&self) -> PathBuf {
        self.config_dir.join(CONSENT_FILE)
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }
}

/// `$XDG_CONFIG_HOME/guessing-game`, else `~/.config/guessing-game`.
pub fn default_config_dir() -> PathBuf {
    platform_dir(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".config"],
    )
}

/// `$XDG_DATA_HOME/guessing-game`, else `~/.local/share/guessing-game`.
pub fn default_data_dir() -> PathBuf {
    platform_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
        &[".local", "share"],
    )
}

fn platform_dir(xdg: Option<String>, home: Option<String>, home_suffix: &[&str]) -> PathBuf {
    if let Some(root) = xdg.filter(|s| !s.is_empty()) {
        return PathBuf::from(root).join(APP_DIR);
    }
    match home.filter(|s| !s.is_empty()) {
        Some(home) => {
            let mut dir = PathBuf::from(home);
            for part in home_suffix {
                dir.push(part);
            }
            dir.join(APP_DIR)
        }
        // No home directory known: keep files next to the working directory.
        None => PathBuf::from(".").join(APP_DIR),
    }
}

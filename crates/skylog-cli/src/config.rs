//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// History rows shown when neither the flag nor the config sets a limit.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Observation database path
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Use Fahrenheit for temperature
    #[serde(default)]
    pub fahrenheit: bool,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default number of history rows
    #[serde(default)]
    pub history_limit: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skylog")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`; a missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Effective history limit.
    pub fn history_limit(&self) -> u32 {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

/// Resolve the database path: flag or `SKYLOG_DB`, then config, then the
/// platform default.
pub fn resolve_database(database: Option<PathBuf>, config: &Config) -> PathBuf {
    database
        .or_else(|| config.database.clone())
        .unwrap_or_else(skylog_store::default_db_path)
}

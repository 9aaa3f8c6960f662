//! Store configuration
//!
//! Configuration loaded from `.redux-store.toml`. Every field has a default,
//! so a partial (or empty) file is valid.

use crate::config_file::{config_candidates, read_first};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration file layout
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the action logging middleware
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Whether the logging middleware is installed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Level used for action lines (error, warn, info, debug, trace)
    #[serde(default = "default_level")]
    pub level: String,

    /// Also log the state produced by each dispatch
    #[serde(default)]
    pub log_state: bool,

    /// Number of action type names kept in memory (0 disables the history)
    #[serde(default)]
    pub history_capacity: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_level() -> String {
    "debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: default_level(),
            log_state: false,
            history_capacity: 0,
        }
    }
}

impl LoggingConfig {
    /// Parse the configured level
    pub fn level(&self) -> Result<log::Level, ConfigError> {
        log::Level::from_str(self.level.trim())
            .map_err(|_| ConfigError::InvalidLevel(self.level.clone()))
    }
}

impl StoreConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(content)?;
        // Reject bad levels at load time rather than on first dispatch
        config.logging.level()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        Self::load_from(config_candidates())
    }

    /// Load the first existing candidate; defaults if none exists or it fails to parse
    pub fn load_from<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        if let Some((path, content)) = read_first(candidates) {
            match Self::from_toml_str(&content) {
                Ok(config) => {
                    log::info!("Loaded store config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default store config");
        Self::default()
    }
}

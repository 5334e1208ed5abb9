//! Application configuration file.
//!
//! # Responsibility
//! - Load user settings from a JSON file, falling back to defaults.
//! - Apply the endpoint environment override.
//!
//! # Invariants
//! - A missing file yields defaults; a malformed file is an error.
//! - Unknown keys are rejected so typos do not silently fall back.

use crate::sync::config::{SyncConfig, DATABASE_URL_ENV};
use crate::sync::SyncError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name used inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Errors from loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

impl From<SyncError> for ConfigError {
    fn from(value: SyncError) -> Self {
        Self::Invalid(value.to_string())
    }
}

/// User-facing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite file. `None` lets the front end choose a platform default.
    pub db_path: Option<PathBuf>,
    /// Absolute log directory. `None` lets the front end choose.
    pub log_dir: Option<PathBuf>,
    /// `trace|debug|info|warn|error`; `None` uses the build default.
    pub log_level: Option<String>,
    /// New items go before the first item when true.
    pub prepend: bool,
    /// Whether item views include done items.
    pub display_done: bool,
    pub sync: SyncConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_dir: None,
            log_level: None,
            prepend: true,
            display_done: false,
            sync: SyncConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path` when it exists, defaults otherwise, then applies the
    /// `ZTOND_DATABASE_URL` override and validates.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(path)?;
        config
            .sync
            .apply_env_override(std::env::var(DATABASE_URL_ENV).ok());
        config.sync.validate()?;
        Ok(config)
    }

    /// Loads `path` without environment overrides.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

//! Hosted sync endpoint configuration.

use super::SyncError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured endpoint URL.
pub const DATABASE_URL_ENV: &str = "ZTOND_DATABASE_URL";

static DATABASE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?(?::\d{1,5})?(?:/\S*)?$")
        .expect("database url pattern is a valid regex")
});

/// Connection settings for the hosted sync endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Endpoint URL. Empty disables sync.
    pub database_url: String,
    /// Whether pushes require an authenticated session.
    pub require_auth: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            require_auth: true,
        }
    }
}

/// Effective sync state derived from config and session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// No endpoint configured; data stays local.
    Disabled,
    /// Endpoint configured but waiting for the user to sign in.
    AwaitingAuth { database_url: String },
    /// Pushes may proceed.
    Ready { database_url: String },
}

impl SyncConfig {
    pub fn is_enabled(&self) -> bool {
        !self.database_url.trim().is_empty()
    }

    /// Replaces the endpoint URL with the environment override when set.
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|url| !url.trim().is_empty()) {
            self.database_url = url;
        }
    }

    /// Checks the endpoint URL shape. A disabled config is always valid.
    pub fn validate(&self) -> Result<(), SyncError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let url = self.database_url.trim();
        if !DATABASE_URL_PATTERN.is_match(url) {
            return Err(SyncError::InvalidConfig(format!(
                "database_url must be an http(s) url, got `{url}`"
            )));
        }
        Ok(())
    }

    pub fn status(&self, credentials_present: bool) -> Result<SyncStatus, SyncError> {
        self.validate()?;
        if !self.is_enabled() {
            return Ok(SyncStatus::Disabled);
        }
        let database_url = self.database_url.trim().to_string();
        if self.require_auth && !credentials_present {
            return Ok(SyncStatus::AwaitingAuth { database_url });
        }
        Ok(SyncStatus::Ready { database_url })
    }
}

//! Sync endpoint configuration and the local change outbox.
//!
//! # Responsibility
//! - Describe the hosted sync endpoint (`database_url`, `require_auth`).
//! - Journal every local mutation so a provider can mirror it.
//! - Drive one push cycle against a pluggable provider.
//!
//! # Invariants
//! - Conflict resolution and transport belong to the provider, never to core.
//! - A change is removed from the journal only after the provider accepts it.

pub mod config;
pub mod journal;
pub mod provider;

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from sync configuration and push cycles.
#[derive(Debug)]
pub enum SyncError {
    /// Endpoint configuration is malformed.
    InvalidConfig(String),
    /// No sync endpoint is configured.
    Disabled,
    /// Endpoint requires auth and no credentials are present.
    AuthRequired,
    /// Provider rejected or failed a push.
    Provider {
        provider_id: String,
        message: String,
    },
    /// Reading or acknowledging the local journal failed.
    Journal(RepoError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(message) => write!(f, "invalid sync config: {message}"),
            Self::Disabled => write!(f, "sync is disabled: no database url configured"),
            Self::AuthRequired => write!(f, "sync endpoint requires authentication"),
            Self::Provider {
                provider_id,
                message,
            } => write!(f, "sync provider `{provider_id}` failed: {message}"),
            Self::Journal(err) => write!(f, "change journal error: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Journal(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SyncError {
    fn from(value: RepoError) -> Self {
        Self::Journal(value)
    }
}

//! CLI error type and exit codes.

use thiserror::Error;
use ztond_core::db::DbError;
use ztond_core::{ConfigError, LoggingError, RepoError, SyncError, TodoServiceError};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    #[error("database error: {0}")]
    Db(#[from] DbError),

    #[error("{0}")]
    Repo(#[from] RepoError),

    #[error("{0}")]
    Service(#[from] TodoServiceError),

    #[error("{0}")]
    Sync(#[from] SyncError),

    /// A list/item reference matched nothing.
    #[error("no {kind} matches `{reference}`")]
    NotFound { kind: &'static str, reference: String },

    /// A list/item reference matched more than one record.
    #[error("`{reference}` matches {count} {kind}s; use a longer id")]
    Ambiguous {
        kind: &'static str,
        reference: String,
        count: usize,
    },

    #[error("no active list; create one with `ztond list-add <title>`")]
    NoActiveList,

    #[error("no platform data directory available; pass --db and --config")]
    NoDataDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maps errors to process exit codes.
pub fn to_exit_code(err: &CliError) -> i32 {
    match err {
        CliError::NotFound { .. } | CliError::Ambiguous { .. } | CliError::NoActiveList => 2,
        CliError::Service(
            TodoServiceError::ListNotFound(_) | TodoServiceError::ItemNotFound(_),
        ) => 2,
        CliError::Service(TodoServiceError::ListArchived(_) | TodoServiceError::SameList(_)) => 3,
        CliError::Config(_) | CliError::NoDataDir => 78,
        _ => 1,
    }
}

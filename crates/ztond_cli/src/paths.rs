//! Default file locations.

use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use ztond_core::config::CONFIG_FILE_NAME;
use ztond_core::AppConfig;

const DB_FILE_NAME: &str = "ztond.sqlite3";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "ztond").ok_or(CliError::NoDataDir)
}

/// `--config` when given, otherwise `<config dir>/config.json`.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME)),
    }
}

/// Effective file locations after flags and config are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
}

/// Flag over config over platform default.
pub fn resolve_paths(db_flag: Option<PathBuf>, config: &AppConfig) -> Result<ResolvedPaths> {
    let db_path = match db_flag.or_else(|| config.db_path.clone()) {
        Some(path) => path,
        None => project_dirs()?.data_dir().join(DB_FILE_NAME),
    };
    let log_dir = match config.log_dir.clone() {
        Some(dir) if dir.is_relative() => std::env::current_dir()?.join(dir),
        Some(dir) => dir,
        None => project_dirs()?.data_local_dir().join("logs"),
    };
    Ok(ResolvedPaths { db_path, log_dir })
}

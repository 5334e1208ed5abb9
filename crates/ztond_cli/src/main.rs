//! `ztond` command-line entry point.
//!
//! # Responsibility
//! - Merge flags, config file and platform defaults into one runtime setup.
//! - Start logging before touching the database.
//! - Map failures to a message on stderr and a non-zero exit code.

mod app;
mod cli;
mod error;
mod paths;
mod render;
mod resolve;

use app::{App, SYNC_TOKEN_ENV};
use clap::Parser;
use cli::Cli;
use error::{to_exit_code, Result};
use log::{error, info};
use std::io;
use ztond_core::db::open_db;
use ztond_core::{default_log_level, flush_logging, init_logging, AppConfig};

fn main() {
    let cli = Cli::parse();
    let result = run(cli);
    if let Err(err) = &result {
        error!("event=cli_exit module=cli status=error");
        eprintln!("error: {err}");
    }
    // Buffered lines are lost once the process exits.
    flush_logging();
    if let Err(err) = result {
        std::process::exit(to_exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = paths::config_path(cli.config)?;
    let config = AppConfig::load(&config_path)?;
    let paths = paths::resolve_paths(cli.db, &config)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or(default_log_level())
    };
    init_logging(level, &paths.log_dir)?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        ztond_core::core_version()
    );

    if let Some(parent) = paths.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = open_db(&paths.db_path)?;

    let credentials_present =
        std::env::var(SYNC_TOKEN_ENV).is_ok_and(|token| !token.trim().is_empty());
    let app = App::new(&conn, &config, credentials_present)?;

    let stdout = io::stdout();
    let stdin = io::stdin();
    app.run(cli.command, &mut stdout.lock(), &mut stdin.lock())
}

//! File logging. The TUI owns the terminal, so logs go to a daily file in
//! the config directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "vidfeed.log";

pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// whole run or buffered lines are lost on exit.
pub fn init(config_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    let dir = log_dir(config_dir);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vidfeed={default_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

//! Logging configuration for chinook-query.
//!
//! Logs go to stderr so they never mix with answers on stdout, or to a file
//! when one is given. `RUST_LOG` overrides the default level in both cases.

use crate::error::{ChinookError, Result};
use std::fs::{self, File};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Builds the filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes logging to a file, truncated on each run.
pub fn init_file_logging(path: &Path, default_level: &str) -> Result<()> {
    let log_file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .init();

    Ok(())
}

/// Creates the log file and any missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            ChinookError::config(format!(
                "Could not create log directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    File::create(path).map_err(|e| {
        ChinookError::config(format!("Could not create log file {}: {e}", path.display()))
    })
}

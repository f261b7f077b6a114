//! Tracing subscriber setup.
//!
//! The TUI owns stdout, so in that mode logs go to a file; the one-shot CLI
//! logs to stderr.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;
use crate::error::AppError;

pub const TUI_LOG_FILE: &str = "tdash.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Call once, before any fetch.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let res = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = File::create(&path)
                .map_err(|e| AppError::new(4, format!("Failed to create log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };

    res.map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}

//! Tracing subscriber setup.
//!
//! Filter directives come from `ASKDESK_LOG` (default `warn`). Events go to
//! `ASKDESK_LOG_FILE` when set, otherwise to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Builds the filter from a directive, falling back to [`DEFAULT_LOG_FILTER`]
/// when it is missing or blank.
pub fn build_env_filter(directive: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let directive = directive
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LOG_FILTER);

    EnvFilter::try_new(directive).map_err(|error| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        message: error.to_string(),
    })
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &EnvConfig) -> Result<(), LoggingError> {
    let filter = build_env_filter(config.log_filter.as_deref())?;

    let installed = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLogFile {
                    path: PathBuf::from(path),
                    source,
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init(),
    };

    installed.map_err(|error| LoggingError::Install(error.to_string()))
}

//! Environment configuration.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const LOG_ENV_VAR: &str = "ASKDESK_LOG";
pub const LOG_FILE_ENV_VAR: &str = "ASKDESK_LOG_FILE";
pub const SERVICE_ENV_VAR: &str = "ASKDESK_SERVICE";
pub const BASE_URL_ENV_VAR: &str = "ASKDESK_BASE_URL";
pub const TIMEOUT_ENV_VAR: &str = "ASKDESK_TIMEOUT_SEC";
pub const SKIP_HISTORY_ENV_VAR: &str = "ASKDESK_SKIP_HISTORY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds greater than zero, got '{value}'")]
    InvalidTimeout { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Tracing filter directive.
    pub log_filter: Option<String>,
    /// Log file path; stderr when unset.
    pub log_file: Option<String>,
    /// Answer service id (`http` or `mock`).
    pub service: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub skip_history: bool,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_filter: env_string_opt(LOG_ENV_VAR),
            log_file: env_string_opt(LOG_FILE_ENV_VAR),
            service: env_string_opt(SERVICE_ENV_VAR).map(|value| value.trim().to_lowercase()),
            base_url: env_string_opt(BASE_URL_ENV_VAR).map(|value| value.trim().to_string()),
            timeout: env_timeout(TIMEOUT_ENV_VAR)?,
            skip_history: env_flag(SKIP_HISTORY_ENV_VAR),
        })
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_timeout(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = env_string_opt(key) else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Some(Duration::from_secs(seconds))),
        _ => Err(ConfigError::InvalidTimeout { key, value }),
    }
}

//! Environment-driven configuration.
//!
//! Everything has a default; the binary runs with no environment at all.
//! Parsing is decoupled from the process environment through a lookup
//! function so the tests use a plain `HashMap`.

use std::path::PathBuf;

use thiserror::Error;

use geowatch_scraper::Endpoints;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

/// Loads configuration from the process environment.
///
/// # Errors
///
/// `ConfigError::InvalidEnvVar` when a numeric knob does not parse.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default =
        |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    Ok(AppConfig {
        data_dir: PathBuf::from(or_default("GEOWATCH_DATA_DIR", "./data")),
        base_url: or_default("GEOWATCH_BASE_URL", Endpoints::DEFAULT_ROOT),
        user_agent: or_default("GEOWATCH_USER_AGENT", "geowatch/0.1 (bulletin-sync)"),
        request_timeout_secs: parse_u64("GEOWATCH_REQUEST_TIMEOUT_SECS", "30")?,
        max_retries: parse_u32("GEOWATCH_MAX_RETRIES", "3")?,
        retry_backoff_base_secs: parse_u64("GEOWATCH_RETRY_BACKOFF_BASE_SECS", "5")?,
    })
}

//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub allowed_origin: String,
    pub session_ttl_days: i64,
    pub openai_api_key: Option<String>,
    pub translate_model: String,
    pub translation_cache_ttl: Duration,
    pub translation_cache_capacity: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin = std::env::var("ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let session_ttl_days = parse_var("SESSION_TTL_DAYS", 30)?;

        // --- Load Translation Settings (the API key is optional) ---
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let translate_model =
            std::env::var("TRANSLATE_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let translation_cache_ttl =
            Duration::from_secs(parse_var("TRANSLATION_CACHE_TTL_SECS", 3600)?);
        let translation_cache_capacity = parse_var("TRANSLATION_CACHE_CAPACITY", 256)?;

        Ok(Self {
            bind_address,
            log_level,
            allowed_origin,
            session_ttl_days,
            openai_api_key,
            translate_model,
            translation_cache_ttl,
            translation_cache_capacity,
        })
    }
}

/// Parses an optional numeric environment variable, falling back to a default.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

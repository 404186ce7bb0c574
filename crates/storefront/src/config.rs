//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FOODY_API_BASE_URL` - Base URL of the Foody REST backend
//!
//! ## Optional
//! - `FOODY_REQUEST_TIMEOUT_SECS` - Per-request timeout ceiling (default: 10)
//! - `FOODY_SESSION_FILE` - Path of the persisted session record
//!   (default: `foody_auth.json` in the working directory)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_FILE: &str = "foody_auth.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the Foody REST backend.
    pub api_base_url: Url,
    /// Fixed per-request timeout ceiling.
    pub request_timeout: Duration,
    /// Location of the persisted `{user, token}` record.
    pub session_file: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("FOODY_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FOODY_API_BASE_URL".to_string(), e.to_string())
            })?;

        let request_timeout = get_env_or_default(
            "FOODY_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("FOODY_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let session_file = std::env::var("FOODY_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self {
            api_base_url,
            request_timeout,
            session_file,
        })
    }

    /// Build a configuration directly, bypassing the environment.
    ///
    /// Uses the default request timeout; intended for tests and embedders
    /// with their own configuration source.
    #[must_use]
    pub fn new(api_base_url: Url, session_file: PathBuf) -> Self {
        Self {
            api_base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_timeout() {
        let config = StorefrontConfig::new(
            "http://localhost:8080/api/".parse().expect("valid url"),
            PathBuf::from("/tmp/session.json"),
        );
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("FOODY_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: FOODY_API_BASE_URL"
        );
    }
}

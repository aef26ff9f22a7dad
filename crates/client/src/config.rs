//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KEDAI_API_BASE_URL` - Base URL of the coffee-shop backend (e.g., `http://localhost:5000`)
//!
//! ## Optional
//! - `KEDAI_DATA_DIR` - Directory for persisted snapshots (default: `.kedai`)
//! - `KEDAI_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 5)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default request timeout applied to every backend call.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// Default snapshot directory when `KEDAI_DATA_DIR` is not set.
const DEFAULT_DATA_DIR: &str = ".kedai";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the coffee-shop backend.
    pub api_base_url: Url,
    /// Directory holding the persisted auth/cart snapshots.
    pub data_dir: PathBuf,
    /// Fixed timeout applied uniformly to all backend calls.
    pub http_timeout: Duration,
}

impl ClientConfig {
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

        let api_base_url = get_required_env("KEDAI_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("KEDAI_API_BASE_URL".to_string(), e.to_string())
            })?;

        let data_dir = PathBuf::from(get_env_or_default("KEDAI_DATA_DIR", DEFAULT_DATA_DIR));

        let timeout_secs = get_env_or_default(
            "KEDAI_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("KEDAI_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            data_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration directly (tests and embedders).
    #[must_use]
    pub fn new(api_base_url: Url, data_dir: PathBuf) -> Self {
        Self {
            api_base_url,
            data_dir,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
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

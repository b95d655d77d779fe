//! Client configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, then handed to [`crate::StoreClient::new`] explicitly.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default API root when `TIENDAS_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Store API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, without the `/api` prefix (e.g. `http://localhost:3000`)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Builds a config for `base_url` with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = ClientConfig {
            base_url: base_url.into(),
            timeout_secs: 10,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ClientConfig {
            base_url: env::var("TIENDAS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            timeout_secs: env::var("TIENDAS_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TIENDAS_HTTP_TIMEOUT_SECS".to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingRequired("TIENDAS_API_URL".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("TIENDAS_API_URL".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("TIENDAS_HTTP_TIMEOUT_SECS".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins `path` (starting with `/api/...`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

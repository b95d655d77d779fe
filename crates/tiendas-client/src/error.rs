//! # Client Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reqwest::Error ─────────┐                                              │
//! │  non-2xx response ───────┤                                              │
//! │  undecodable body ───────┼──► ClientError ──► user_message()            │
//! │  ValidationError ────────┘                    │                         │
//! │                                               ▼                         │
//! │                                   view error state / fallback UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries happen anywhere; a failed call is reported once.

use thiserror::Error;
use tiendas_core::ValidationError;

use crate::config::ConfigError;

/// Store API client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a response (DNS, refused, timeout...).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// API answered with a success status but the body did not match the
    /// expected shape.
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A record the flow depends on is missing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// The message a view stores in its error state.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            ClientError::Decode { .. } => {
                "The store sent a response we could not read. Try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for 404-style outcomes, local or remote.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::NotFound { .. } | ClientError::Status { status: 404, .. }
        )
    }
}

/// Convenience type alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;

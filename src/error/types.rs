//! Main error type for the chat and translation client.

use thiserror::Error;
use super::categories::*;

/// Result type alias for crate operations.
pub type PolyglotResult<T> = Result<T, PolyglotError>;

/// Top-level error type for the crate.
#[derive(Error, Debug, Clone)]
pub enum PolyglotError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// An outbound request failed.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Sign-in failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// The message store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A request payload could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Encoder message.
        message: String,
    },
}

impl PolyglotError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            PolyglotError::Request(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<url::ParseError> for PolyglotError {
    fn from(err: url::ParseError) -> Self {
        PolyglotError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for PolyglotError {
    fn from(err: serde_json::Error) -> Self {
        PolyglotError::Serialization {
            message: err.to_string(),
        }
    }
}

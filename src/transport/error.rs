//! Transport layer error types.

use crate::error::RequestError;

/// Transport error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or broke.
    #[error("Connection error: {0}")]
    Connection(String),
    /// The request exceeded its timeout.
    #[error("Timeout")]
    Timeout,
    /// The response could not be read.
    #[error("Request error: {0}")]
    Request(String),
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        RequestError::Transport {
            message: err.to_string(),
        }
    }
}

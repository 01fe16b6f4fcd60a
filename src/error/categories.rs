//! Error category types for granular error handling.

use thiserror::Error;

/// HTTP statuses that end a request immediately without further attempts.
pub const NON_RETRYABLE_STATUSES: [u16; 3] = [400, 401, 403];

/// Configuration-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No API key was supplied or found in the environment.
    #[error("Missing API key")]
    MissingApiKey,

    /// The base URL does not parse.
    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
    },

    /// Any other rejected setting.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong.
        message: String,
    },
}

/// Classification carried by a terminal request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Every attempt failed with a retryable error and the budget ran out.
    RetryableExhausted,
    /// The request ended before its budget was spent.
    NonRetryable,
}

/// Failures produced while executing an outbound request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// No response was received. Retryable.
    #[error("Transport error: {message}")]
    Transport {
        /// Transport failure description, without the request URL.
        message: String,
    },

    /// A non-2xx status outside [`NON_RETRYABLE_STATUSES`]. Retryable.
    #[error("HTTP error! Status: {status}")]
    Status {
        /// Response status.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// A status in [`NON_RETRYABLE_STATUSES`]; ends the call at once.
    #[error("API Error: {status}")]
    NonRetryable {
        /// Response status.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// Every attempt of the budget failed with a retryable error.
    #[error("Max retries reached after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Error of the final attempt.
        last: Box<RequestError>,
    },

    /// The retry budget was zero, so nothing was sent.
    #[error("Retry budget must allow at least one attempt")]
    InvalidRetryBudget,

    /// The caller's cancellation token fired.
    #[error("Request cancelled")]
    Cancelled,
}

impl RequestError {
    /// Builds the error for a completed response whose status is not a success.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if NON_RETRYABLE_STATUSES.contains(&status) {
            RequestError::NonRetryable { status, body }
        } else {
            RequestError::Status { status, body }
        }
    }

    /// Returns true if another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestError::Transport { .. } | RequestError::Status { .. }
        )
    }

    /// Terminal classification of this failure.
    pub fn classification(&self) -> FailureClass {
        match self {
            RequestError::Exhausted { .. }
            | RequestError::Transport { .. }
            | RequestError::Status { .. } => FailureClass::RetryableExhausted,
            RequestError::NonRetryable { .. }
            | RequestError::InvalidRetryBudget
            | RequestError::Cancelled => FailureClass::NonRetryable,
        }
    }

    /// HTTP status associated with this failure, looking through exhaustion.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } | RequestError::NonRetryable { status, .. } => {
                Some(*status)
            }
            RequestError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

/// Identity provider errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The initial auth token was not accepted.
    #[error("Token sign-in rejected: {message}")]
    TokenRejected {
        /// Provider message.
        message: String,
    },

    /// Anonymous sign-in failed or is disabled.
    #[error("Anonymous sign-in unavailable: {message}")]
    AnonymousUnavailable {
        /// Provider message.
        message: String,
    },
}

/// Message store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store no longer accepts writes or publishes snapshots.
    #[error("Message store closed")]
    Closed,

    /// The store refused a message.
    #[error("Write rejected: {message}")]
    WriteRejected {
        /// Store message.
        message: String,
    },
}

//! Observability layer for the chat and translation client.
//!
//! Structured logging with sensitive data redaction, backed by `tracing`.
//!
//! ```rust
//! use polyglot_chat::observability::{Logger, LogLevel, StructuredLogger};
//! use serde_json::json;
//!
//! let logger = StructuredLogger::new("polyglot.session")
//!     .with_level(LogLevel::Debug);
//!
//! logger.debug("Message sent", json!({ "message_id": "abc" }));
//! ```

pub mod logging;

pub use logging::{LogFormat, LogLevel, Logger, LoggingConfig, NoopLogger, StructuredLogger};

use std::sync::Arc;

/// Logger used when a component is not given one explicitly.
pub fn default_logger(name: &str) -> Arc<dyn Logger> {
    Arc::new(StructuredLogger::new(name))
}

//! Resilience layer for outbound requests.
//!
//! [`ResilientExecutor`] performs a request with bounded exponential-backoff
//! retry and classifies failures as retryable or terminal. Callers depend on
//! the [`RequestExecutor`] trait so a test double can stand in for it.

mod executor;
mod retry;

pub use crate::config::RetryConfig;
pub use executor::{RequestExecutor, ResilientExecutor};
pub use retry::BackoffPolicy;

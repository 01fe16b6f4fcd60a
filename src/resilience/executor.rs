//! Resilient request execution with bounded retries.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::retry::BackoffPolicy;
use crate::auth::redact_url;
use crate::config::RetryConfig;
use crate::error::RequestError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Performs an outbound request, returning the successful response or a terminal failure.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute the request.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;

    /// Execute the request, giving up with `RequestError::Cancelled` once `cancel` fires.
    async fn execute_with_cancellation(
        &self,
        request: HttpRequest,
        cancel: CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RequestError::Cancelled),
            result = self.execute(request) => result,
        }
    }
}

/// Executes requests over an [`HttpTransport`] with exponential backoff.
///
/// - 2xx: returned immediately.
/// - 400, 401, 403: `RequestError::NonRetryable`, no further attempts.
/// - Any other status or a transport error: retried after a backoff delay
///   until `max_retries` attempts have been made, then
///   `RequestError::Exhausted` carrying the last error.
pub struct ResilientExecutor {
    transport: Arc<dyn HttpTransport>,
    config: RetryConfig,
    policy: BackoffPolicy,
}

impl ResilientExecutor {
    /// Creates an executor with the given transport and retry configuration.
    pub fn new(transport: Arc<dyn HttpTransport>, config: RetryConfig) -> Self {
        let policy = BackoffPolicy::from_config(&config);
        Self {
            transport,
            config,
            policy,
        }
    }

    /// Creates an executor with the default retry configuration (5 attempts).
    pub fn with_defaults(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, RetryConfig::default())
    }

    /// Returns the retry configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs the request with an explicit attempt budget.
    ///
    /// A budget of zero is a caller error and fails before any attempt is made.
    pub async fn execute_with_budget(
        &self,
        request: &HttpRequest,
        max_retries: u32,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        if max_retries == 0 {
            tracing::error!(url = %redact_url(&request.url), "Refusing request with an empty retry budget");
            return Err(RequestError::InvalidRetryBudget);
        }

        let mut attempt: u32 = 0;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RequestError::Cancelled),
                result = self.transport.send(request.clone()) => result,
            };

            let error = match outcome {
                Ok(response) if response.is_success() => {
                    if attempt > 0 {
                        tracing::info!(
                            attempts = attempt + 1,
                            status = response.status,
                            "Request succeeded after retries"
                        );
                    }
                    return Ok(response);
                }
                Ok(response) => RequestError::from_status(response.status, response.text()),
                Err(e) => RequestError::from(e),
            };

            if !error.is_retryable() {
                tracing::error!(
                    attempt = attempt + 1,
                    status = ?error.status(),
                    error = %error,
                    "Non-retryable API error"
                );
                return Err(error);
            }

            if attempt + 1 >= max_retries {
                tracing::error!(
                    attempts = attempt + 1,
                    error = %error,
                    "Max retries reached. Failing request."
                );
                return Err(RequestError::Exhausted {
                    attempts: attempt + 1,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(attempt);
            tracing::warn!(
                attempt = attempt + 1,
                max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Attempt failed. Retrying after backoff."
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RequestError::Cancelled),
                _ = sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

#[async_trait]
impl RequestExecutor for ResilientExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.execute_with_budget(&request, self.config.max_retries, &CancellationToken::new())
            .await
    }

    async fn execute_with_cancellation(
        &self,
        request: HttpRequest,
        cancel: CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        self.execute_with_budget(&request, self.config.max_retries, &cancel)
            .await
    }
}

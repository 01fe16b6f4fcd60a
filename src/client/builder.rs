//! Builder wiring a [`GeminiTranslator`] to its executor and transport.

use secrecy::SecretString;
use std::sync::Arc;

use crate::config::{TranslatorConfig, TranslatorConfigBuilder};
use crate::error::{PolyglotError, RequestError};
use crate::observability::Logger;
use crate::resilience::{RequestExecutor, ResilientExecutor};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::translation::GeminiTranslator;

/// Builder for a [`GeminiTranslator`].
///
/// Configuration comes from a [`TranslatorConfig`]; the transport, executor
/// and logger can be replaced for testing.
///
/// # Example
///
/// ```no_run
/// use polyglot_chat::TranslatorBuilder;
/// use secrecy::SecretString;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let translator = TranslatorBuilder::new()
///     .api_key(SecretString::new("your-api-key".into()))
///     .max_retries(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct TranslatorBuilder {
    config: Option<TranslatorConfig>,
    config_builder: TranslatorConfigBuilder,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    executor: Option<Arc<dyn RequestExecutor>>,
    logger: Option<Arc<dyn Logger>>,
}

impl TranslatorBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: TranslatorConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: SecretString) -> Self {
        self.config_builder = self.config_builder.api_key(key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: &str) -> Result<Self, PolyglotError> {
        self.config_builder = self.config_builder.base_url(url)?;
        Ok(self)
    }

    /// Sets the model.
    pub fn model(mut self, model: &str) -> Self {
        self.config_builder = self.config_builder.model(model);
        self
    }

    /// Sets the maximum number of attempts per request.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config_builder = self.config_builder.max_retries(retries);
        self
    }

    /// Sets a custom HTTP transport (for testing).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom request executor. The transport is then unused.
    pub fn executor(mut self, executor: Arc<dyn RequestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets a custom logger (for testing).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the translator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or invalid, or
    /// if the HTTP client cannot be created.
    pub fn build(self) -> Result<GeminiTranslator, PolyglotError> {
        let config = match self.config {
            Some(config) => config,
            None => self.config_builder.build()?,
        };

        let executor = match self.executor {
            Some(executor) => executor,
            None => {
                let transport: Arc<dyn HttpTransport> = match self.transport {
                    Some(transport) => transport,
                    None => Arc::new(
                        ReqwestTransport::from_config(&config).map_err(RequestError::from)?,
                    ),
                };
                Arc::new(ResilientExecutor::new(transport, config.retry_config.clone()))
            }
        };

        tracing::debug!(model = %config.model, "Creating translator");

        let translator = GeminiTranslator::new(&config, executor);
        Ok(match self.logger {
            Some(logger) => translator.with_logger(logger),
            None => translator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::mocks::{MockHttpTransport, MockRequestExecutor};
    use crate::observability::NoopLogger;
    use crate::translation::Translator;

    #[test]
    fn test_missing_api_key() {
        let result = TranslatorBuilder::new().build();
        assert!(matches!(
            result,
            Err(PolyglotError::Configuration(ConfigurationError::MissingApiKey))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = TranslatorBuilder::new().base_url("not a url");
        assert!(matches!(
            result,
            Err(PolyglotError::Configuration(ConfigurationError::InvalidBaseUrl { .. }))
        ));
    }

    #[test]
    fn test_model_override() {
        let translator = TranslatorBuilder::new()
            .api_key(SecretString::new("key".into()))
            .model("gemini-pro")
            .build()
            .unwrap();
        assert_eq!(translator.model(), "gemini-pro");
    }

    #[tokio::test]
    async fn test_injected_transport_is_used() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"Hallo"}]}}]}"#,
        );

        let translator = TranslatorBuilder::new()
            .api_key(SecretString::new("key".into()))
            .transport(transport.clone())
            .logger(Arc::new(NoopLogger))
            .build()
            .unwrap();

        assert_eq!(translator.translate("Hello", "German").await, "Hallo");
        transport.verify_request(0, crate::transport::HttpMethod::Post, ":generateContent?key=key");
    }

    #[tokio::test]
    async fn test_injected_executor_is_used() {
        let executor = Arc::new(MockRequestExecutor::new());
        executor.enqueue_json(200, "{}");

        let config = TranslatorConfig::builder()
            .api_key(SecretString::new("key".into()))
            .build()
            .unwrap();
        let translator = TranslatorBuilder::from_config(config)
            .executor(executor.clone())
            .logger(Arc::new(NoopLogger))
            .build()
            .unwrap();

        translator.translate("Hello", "German").await;
        executor.verify_request_count(1);
    }
}

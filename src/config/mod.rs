//! Configuration types for the translation client and chat session.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use crate::error::{ConfigurationError, PolyglotError};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default model used for translation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default maximum number of attempts per request.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default base backoff delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Default upper bound (exclusive) of the random jitter in milliseconds.
pub const DEFAULT_JITTER_MS: u64 = 1000;

/// Default application identifier for the message collection.
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Authentication method for the API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use x-goog-api-key header.
    Header,
    /// Use ?key= query parameter.
    #[default]
    QueryParam,
}

/// Retry configuration for the resilient executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_retries: u32,
    /// Delay before the second attempt; doubles for each later attempt.
    pub base_delay: Duration,
    /// Random jitter added to every delay is drawn from `[0, jitter)`.
    pub jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
        }
    }
}

impl RetryConfig {
    /// Creates a retry configuration with the default delays.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Checks that at least one attempt is allowed.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_retries == 0 {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "max_retries must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for the translation client.
#[derive(Clone)]
pub struct TranslatorConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// API version.
    pub api_version: String,
    /// Model used for translation requests.
    pub model: String,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
    /// Authentication method.
    pub auth_method: AuthMethod,
}

impl std::fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

impl TranslatorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `GEMINI_API_KEY` or `GOOGLE_API_KEY` (required)
    /// - `GEMINI_BASE_URL`, `GEMINI_API_VERSION`, `GEMINI_MODEL`
    /// - `GEMINI_TIMEOUT_SECS`, `GEMINI_MAX_RETRIES`
    pub fn from_env() -> Result<Self, PolyglotError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| ConfigurationError::MissingApiKey)?;

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_retries: u32 = std::env::var("GEMINI_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let api_version = std::env::var("GEMINI_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());

        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::builder()
            .api_key(SecretString::new(api_key))
            .base_url(&base_url)?
            .api_version(&api_version)
            .model(&model)
            .timeout(Duration::from_secs(timeout_secs))
            .max_retries(max_retries)
            .build()
    }
}

/// Builder for TranslatorConfig.
#[derive(Default)]
pub struct TranslatorConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    api_version: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
    auth_method: Option<AuthMethod>,
}

impl TranslatorConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, PolyglotError> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the model.
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum attempts, keeping the other retry settings.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<TranslatorConfig, PolyglotError> {
        let api_key = self.api_key
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry_config.max_retries = max_retries;
        }
        retry_config.validate()?;

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "model must not be empty".to_string(),
            }
            .into());
        }

        Ok(TranslatorConfig {
            api_key,
            base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model,
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            retry_config,
            auth_method: self.auth_method.unwrap_or_default(),
        })
    }
}

/// Configuration for a chat session.
#[derive(Clone)]
pub struct ChatConfig {
    /// Application identifier used to scope the message collection.
    pub app_id: String,
    /// Externally issued sign-in token, if any.
    pub initial_auth_token: Option<SecretString>,
    /// Language code translations default to.
    pub default_target_language: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            initial_auth_token: None,
            default_target_language: crate::translation::DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("app_id", &self.app_id)
            .field(
                "initial_auth_token",
                &self.initial_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .field("default_target_language", &self.default_target_language)
            .finish()
    }
}

impl ChatConfig {
    /// Create configuration from `CHAT_APP_ID` and `CHAT_INITIAL_AUTH_TOKEN`.
    pub fn from_env() -> Self {
        let app_id = std::env::var("CHAT_APP_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_ID.to_string());

        let initial_auth_token = std::env::var("CHAT_INITIAL_AUTH_TOKEN")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::new);

        Self {
            app_id,
            initial_auth_token,
            ..Default::default()
        }
    }

    /// Path of the shared message collection for this application.
    pub fn collection_path(&self) -> String {
        crate::chat::collection_path(&self.app_id)
    }
}

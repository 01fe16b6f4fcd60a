//! Translation client backed by the generateContent endpoint.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::prompt::build_translation_request;
use super::types::response_text;
use crate::auth::ApiKeyAuthManager;
use crate::config::TranslatorConfig;
use crate::error::PolyglotError;
use crate::observability::{default_logger, Logger};
use crate::resilience::RequestExecutor;
use crate::transport::{endpoints, HttpRequest, HttpResponse, RequestBuilder};

/// Returned when the request could not be completed or the body was not JSON.
pub const NETWORK_FAILURE_FALLBACK: &str = "Translation failed due to a network or server error.";

/// Returned when the response carried no translated text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Translation failed: API response was empty.";

/// A translated message and the language it was translated into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Translated text, or one of the fallback strings.
    pub text: String,
    /// Display name of the target language.
    pub language: String,
}

/// Translates text into a named language.
///
/// Implementations never fail: problems are reported as user-facing text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang_name` (e.g. "Spanish").
    async fn translate(&self, text: &str, target_lang_name: &str) -> String;
}

/// [`Translator`] that calls the Gemini API through a [`RequestExecutor`].
pub struct GeminiTranslator {
    model: String,
    request_builder: RequestBuilder,
    executor: Arc<dyn RequestExecutor>,
    logger: Arc<dyn Logger>,
}

impl GeminiTranslator {
    /// Creates a translator for the endpoint and credentials in `config`.
    pub fn new(config: &TranslatorConfig, executor: Arc<dyn RequestExecutor>) -> Self {
        let auth_manager = Arc::new(ApiKeyAuthManager::from_config(config));
        Self {
            model: config.model.clone(),
            request_builder: RequestBuilder::new(
                config.base_url.clone(),
                config.api_version.clone(),
                auth_manager,
            ),
            executor,
            logger: default_logger("polyglot.translation"),
        }
    }

    /// Replaces the component logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The model translations are requested from.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Like [`Translator::translate`], but gives up when `cancel` fires.
    ///
    /// A cancelled translation yields the network failure text.
    pub async fn translate_with_cancellation(
        &self,
        text: &str,
        target_lang_name: &str,
        cancel: CancellationToken,
    ) -> String {
        let request = match self.build_request(text, target_lang_name) {
            Ok(request) => request,
            Err(e) => {
                self.logger.error(
                    "Failed to build translation request",
                    json!({ "error": e.to_string(), "model": self.model }),
                );
                return NETWORK_FAILURE_FALLBACK.to_string();
            }
        };

        match self.executor.execute_with_cancellation(request, cancel).await {
            Ok(response) => self.extract_translation(&response, target_lang_name),
            Err(e) => {
                self.logger.error(
                    "Translation API call failed",
                    json!({
                        "error": e.to_string(),
                        "status": e.status(),
                        "language": target_lang_name,
                    }),
                );
                NETWORK_FAILURE_FALLBACK.to_string()
            }
        }
    }

    fn build_request(&self, text: &str, target_lang_name: &str) -> Result<HttpRequest, PolyglotError> {
        let payload = build_translation_request(text, target_lang_name);
        self.request_builder
            .build_json_post(&endpoints::generate_content(&self.model), &payload)
    }

    fn extract_translation(&self, response: &HttpResponse, target_lang_name: &str) -> String {
        let parsed = match serde_json::from_slice::<Value>(&response.body) {
            Ok(value) => value,
            Err(e) => {
                self.logger.error(
                    "Translation response was not valid JSON",
                    json!({ "error": e.to_string(), "status": response.status }),
                );
                return NETWORK_FAILURE_FALLBACK.to_string();
            }
        };

        match response_text(&parsed) {
            Some(text) => {
                self.logger.debug(
                    "Translation completed",
                    json!({ "language": target_lang_name, "chars": text.chars().count() }),
                );
                text.to_string()
            }
            None => {
                self.logger.warn(
                    "Translation response contained no text",
                    json!({ "language": target_lang_name }),
                );
                EMPTY_RESPONSE_FALLBACK.to_string()
            }
        }
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str, target_lang_name: &str) -> String {
        self.translate_with_cancellation(text, target_lang_name, CancellationToken::new())
            .await
    }
}

//! # polyglot-chat
//!
//! Core of a chat client with on-demand machine translation.
//!
//! ## Features
//!
//! - Resilient request execution: bounded exponential backoff with jitter,
//!   retryable vs terminal failure classification, cancellation
//! - Translation through the Google Gemini `generateContent` API that never
//!   fails, reporting problems as display text
//! - Live message list behind a store capability, with an in-memory store
//! - Identity bootstrap with token, anonymous and local fallbacks
//! - Secure credential handling with `SecretString`
//! - Structured logging with secret redaction
//! - Mocks for every seam
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polyglot_chat::{create_translator, Translator, TranslatorConfig};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslatorConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .build()?;
//!
//!     let translator = create_translator(config)?;
//!     let text = translator.translate("Good morning", "Spanish").await;
//!     println!("{text}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Translator factory functions and builder
//! - `config` - Configuration types and builders
//! - `auth` - API key placement
//! - `transport` - HTTP transport layer
//! - `error` - Error types and taxonomy
//! - `resilience` - Retrying request executor
//! - `translation` - Translation client, prompts and language catalogue
//! - `identity` - User sign-in
//! - `chat` - Messages and the message store
//! - `session` - Per-user chat session state

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod translation;
pub mod transport;

// Development/testing modules - always available for integration tests
pub mod mocks;

// Re-exports for convenience
pub use auth::{ApiKeyAuthManager, AuthManager};
pub use chat::{ChatMessage, InMemoryMessageStore, MessageStore, MessageSubscription, NewMessage};
pub use client::{create_translator, create_translator_from_env, TranslatorBuilder};
pub use config::{
    AuthMethod, ChatConfig, RetryConfig, TranslatorConfig, TranslatorConfigBuilder,
    DEFAULT_API_VERSION, DEFAULT_APP_ID, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    ConfigurationError, FailureClass, IdentityError, PolyglotError, PolyglotResult, RequestError,
    StoreError,
};
pub use identity::{resolve_identity, IdentityKind, IdentityProvider, LocalIdentityProvider, UserIdentity};
pub use resilience::{BackoffPolicy, RequestExecutor, ResilientExecutor};
pub use session::{ChatSession, SendOutcome};
pub use translation::{
    language_name, GeminiTranslator, LanguageOption, TranslationResult, Translator,
    EMPTY_RESPONSE_FALLBACK, LANGUAGE_OPTIONS, NETWORK_FAILURE_FALLBACK,
};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

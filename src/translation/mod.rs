//! Machine translation of chat messages.
//!
//! [`GeminiTranslator`] builds a translation prompt, sends it through a
//! [`RequestExecutor`](crate::resilience::RequestExecutor) and reduces the
//! outcome to display text. It never returns an error: failures become one of
//! [`NETWORK_FAILURE_FALLBACK`] or [`EMPTY_RESPONSE_FALLBACK`].

mod client;
pub mod languages;
pub mod prompt;
pub mod types;

pub use client::{
    GeminiTranslator, TranslationResult, Translator, EMPTY_RESPONSE_FALLBACK,
    NETWORK_FAILURE_FALLBACK,
};
pub use languages::{
    find_language, language_name, LanguageOption, DEFAULT_TARGET_LANGUAGE, LANGUAGE_OPTIONS,
};

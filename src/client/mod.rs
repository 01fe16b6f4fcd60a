//! Translator construction.

mod builder;

pub use builder::TranslatorBuilder;

use std::sync::Arc;

use crate::config::TranslatorConfig;
use crate::error::PolyglotError;
use crate::translation::Translator;

/// Create a translator from configuration.
pub fn create_translator(config: TranslatorConfig) -> Result<Arc<dyn Translator>, PolyglotError> {
    let translator = TranslatorBuilder::from_config(config).build()?;
    Ok(Arc::new(translator))
}

/// Create a translator from environment variables.
pub fn create_translator_from_env() -> Result<Arc<dyn Translator>, PolyglotError> {
    let config = TranslatorConfig::from_env()?;
    create_translator(config)
}

//! Translate one message with the Gemini-backed translator.
//!
//! # Usage
//!
//! Set your API key as an environment variable:
//! ```bash
//! export GEMINI_API_KEY="your-api-key-here"
//! # or
//! export GOOGLE_API_KEY="your-api-key-here"
//! ```
//!
//! Then run:
//! ```bash
//! cargo run --example translate -- "Good morning, everyone" ja
//! ```
//!
//! The second argument is a language code (default `es`).

use polyglot_chat::observability::{LogLevel, LoggingConfig};
use polyglot_chat::translation::{language_name, DEFAULT_TARGET_LANGUAGE, LANGUAGE_OPTIONS};
use polyglot_chat::{create_translator_from_env, Translator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    LoggingConfig::new().with_level(LogLevel::Info).init()?;

    let mut args = std::env::args().skip(1);
    let text = args.next().unwrap_or_else(|| "Hello, how are you today?".to_string());
    let code = args.next().unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string());

    println!("=== Translation Example ===\n");
    println!("Available languages:");
    for option in LANGUAGE_OPTIONS {
        println!("   {} - {}", option.code, option.name);
    }

    let translator = create_translator_from_env()?;

    let language = language_name(&code);
    println!("\nTranslating to {}: {:?}", language, text);
    let translated = translator.translate(&text, language).await;
    println!("   {}", translated);

    Ok(())
}

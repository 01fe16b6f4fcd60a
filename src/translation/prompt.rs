//! Prompt construction for translation requests.

use super::types::{Content, GenerateContentRequest};

/// System instruction sent with every translation request.
pub const SYSTEM_PROMPT: &str = "You are a professional, high-quality language translator. \
Translate the user's message precisely into the target language provided. \
Respond only with the translated text, do not add any conversational wrappers or extra text.";

/// User instruction asking for `text` in `target_lang_name`.
pub fn user_query(text: &str, target_lang_name: &str) -> String {
    format!("Translate this message to {}: \"{}\"", target_lang_name, text)
}

/// Builds the generateContent payload for one translation.
pub fn build_translation_request(text: &str, target_lang_name: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::from_text(user_query(text, target_lang_name))],
        system_instruction: Some(Content::from_text(SYSTEM_PROMPT)),
    }
}

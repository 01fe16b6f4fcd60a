//! Endpoint path constants and builder functions for the Gemini API.

/// Base path for models endpoints.
pub const MODELS: &str = "/models";

/// Constructs a path for a specific model.
///
/// # Example
///
/// ```
/// use polyglot_chat::transport::endpoints;
///
/// let path = endpoints::model("gemini-pro");
/// assert_eq!(path, "/models/gemini-pro");
/// ```
pub fn model(name: &str) -> String {
    format!("{}/{}", MODELS, name)
}

/// Constructs a path for the generateContent endpoint.
///
/// # Example
///
/// ```
/// use polyglot_chat::transport::endpoints;
///
/// let path = endpoints::generate_content("gemini-2.5-flash-preview-09-2025");
/// assert_eq!(path, "/models/gemini-2.5-flash-preview-09-2025:generateContent");
/// ```
pub fn generate_content(model: &str) -> String {
    format!("{}:generateContent", self::model(model))
}

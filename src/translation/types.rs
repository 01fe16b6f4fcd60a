//! Wire types for the generateContent request, and text extraction from
//! its response.
//!
//! Responses are read through a JSON pointer rather than a typed model, so
//! fields this crate does not use can never reject an otherwise usable
//! answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Location of the translated text in a generateContent response.
pub const RESPONSE_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// A part of a content message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Part {
    /// The text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// A content message made of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Content {
    /// The parts of the content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Content made of a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// Request to generate content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The content to send to the model.
    pub contents: Vec<Content>,
    /// Optional system instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Text of the first part of the first candidate, if present and non-empty.
///
/// Every other field of the response is ignored, whatever its shape.
pub fn response_text(response: &Value) -> Option<&str> {
    response
        .pointer(RESPONSE_TEXT_POINTER)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content::from_text("hello")],
            system_instruction: Some(Content::from_text("be precise")),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{ "parts": [{ "text": "hello" }] }],
                "systemInstruction": { "parts": [{ "text": "be precise" }] }
            })
        );
    }

    #[test]
    fn test_response_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hola" }, { "text": "ignored" }], "role": "model" },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "promptTokenCount": 3 }
        });

        assert_eq!(response_text(&response), Some("Hola"));
    }

    #[test]
    fn test_response_text_ignores_unexpected_sibling_fields() {
        let response = json!({
            "candidates": [{
                "content": { "role": "assistant", "parts": [{ "text": "Hola", "thought": 7 }] },
                "finishReason": 1,
                "safetyRatings": "n/a"
            }],
            "promptFeedback": []
        });

        assert_eq!(response_text(&response), Some("Hola"));
    }

    #[test]
    fn test_response_text_missing_steps() {
        let bodies = [
            json!({}),
            json!({ "candidates": "nope" }),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{}] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }),
        ];

        for body in bodies {
            assert_eq!(response_text(&body), None, "body: {body}");
        }
    }
}

//! LLM response normalization.
//!
//! Pipeline: `extractor::strip_fences` → `lenient::parse_lenient` →
//! (`retry::generate_structured` re-asks once on failure) → a feature schema's
//! `normalize(&Value)`, built from the probing helpers in `fields`.

pub mod extractor;
pub mod fields;
pub mod lenient;
pub mod retry;

use serde_json::Value;
use thiserror::Error;

/// Raw model output kept on errors is cut to this many characters.
pub const EXCERPT_CHARS: usize = 500;

/// The JSON shape a caller expects back from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Shape::Object => value.is_object(),
            Shape::Array => value.is_array(),
        }
    }

    pub fn delimiters(self) -> (char, char) {
        match self {
            Shape::Object => ('{', '}'),
            Shape::Array => ('[', ']'),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Object => "object",
            Shape::Array => "array",
        }
    }
}

/// The model's text could not be parsed into the expected JSON shape.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("malformed response: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
    /// Raw model output, truncated for logging.
    pub excerpt: String,
}

impl MalformedResponse {
    pub fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            excerpt: excerpt(raw, EXCERPT_CHARS),
        }
    }
}

/// Truncates `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("short", 10), "short");
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "é".repeat(20);
        let cut = excerpt(&text, 5);
        assert_eq!(cut, format!("{}...", "é".repeat(5)));
    }

    #[test]
    fn test_shape_matches() {
        assert!(Shape::Object.matches(&json!({})));
        assert!(!Shape::Object.matches(&json!([])));
        assert!(Shape::Array.matches(&json!([1])));
        assert!(!Shape::Array.matches(&json!("[]")));
    }

    #[test]
    fn test_malformed_response_truncates_raw() {
        let raw = "x".repeat(EXCERPT_CHARS + 100);
        let err = MalformedResponse::new(&raw, "bad");
        assert_eq!(err.excerpt.chars().count(), EXCERPT_CHARS + 3);
        assert_eq!(err.to_string(), "malformed response: bad");
    }
}

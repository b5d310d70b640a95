//! Lenient JSON Parser: recovers a JSON value of the expected shape from noisy text.
//!
//! Steps, stopping at the first that yields a value of the expected shape:
//! 1. parse as-is
//! 2. repair (typographic quotes → straight quotes, drop trailing commas), parse
//! 3. slice from the first opening delimiter to the last closing one, repair, parse

use serde_json::Value;

use crate::normalize::{MalformedResponse, Shape};

const LEFT_DOUBLE: char = '\u{201C}';
const RIGHT_DOUBLE: char = '\u{201D}';
const LEFT_SINGLE: char = '\u{2018}';
const RIGHT_SINGLE: char = '\u{2019}';

/// Parses `text` into a value of `shape`, or reports why it could not.
pub fn parse_lenient(text: &str, shape: Shape) -> Result<Value, MalformedResponse> {
    let mut last_error = match attempt(text, shape) {
        Ok(value) => return Ok(value),
        Err(reason) => reason,
    };

    match attempt(&repair(text), shape) {
        Ok(value) => return Ok(value),
        Err(reason) => last_error = reason,
    }

    if let Some(slice) = outermost_slice(text, shape) {
        match attempt(&repair(slice), shape) {
            Ok(value) => return Ok(value),
            Err(reason) => last_error = reason,
        }
    } else {
        last_error = format!("no JSON {} found ({last_error})", shape.name());
    }

    Err(MalformedResponse::new(text, last_error))
}

fn attempt(candidate: &str, shape: Shape) -> Result<Value, String> {
    let value: Value = serde_json::from_str(candidate.trim()).map_err(|e| e.to_string())?;
    if shape.matches(&value) {
        Ok(value)
    } else {
        Err(format!(
            "expected a JSON {}, got {}",
            shape.name(),
            json_type_name(&value)
        ))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Slice from the first opening delimiter of `shape` to the last closing one, inclusive.
fn outermost_slice(text: &str, shape: Shape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[derive(Clone, Copy)]
enum ScanState {
    Code,
    /// Inside a string opened with a straight quote: copied verbatim.
    Straight { escaped: bool },
    /// Inside a string opened with a typographic quote: closed by either kind.
    Typographic { escaped: bool },
}

/// Normalizes typographic quotes and strips trailing commas before `}` / `]`.
///
/// Strings opened with a straight quote are never modified, so typographic quotes and
/// commas that are part of string content survive.
fn repair(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = ScanState::Code;

    for (i, &c) in chars.iter().enumerate() {
        state = match state {
            ScanState::Code => match c {
                '"' => {
                    out.push('"');
                    ScanState::Straight { escaped: false }
                }
                LEFT_DOUBLE | RIGHT_DOUBLE => {
                    out.push('"');
                    ScanState::Typographic { escaped: false }
                }
                LEFT_SINGLE | RIGHT_SINGLE => {
                    out.push('\'');
                    ScanState::Code
                }
                ',' if closes_next(&chars[i + 1..]) => ScanState::Code,
                _ => {
                    out.push(c);
                    ScanState::Code
                }
            },
            ScanState::Straight { escaped } => {
                out.push(c);
                match c {
                    _ if escaped => ScanState::Straight { escaped: false },
                    '\\' => ScanState::Straight { escaped: true },
                    '"' => ScanState::Code,
                    _ => ScanState::Straight { escaped: false },
                }
            }
            ScanState::Typographic { escaped } => match c {
                _ if escaped => {
                    out.push(c);
                    ScanState::Typographic { escaped: false }
                }
                '\\' => {
                    out.push(c);
                    ScanState::Typographic { escaped: true }
                }
                '"' | LEFT_DOUBLE | RIGHT_DOUBLE => {
                    out.push('"');
                    ScanState::Code
                }
                _ => {
                    out.push(c);
                    ScanState::Typographic { escaped: false }
                }
            },
        };
    }

    out
}

fn closes_next(rest: &[char]) -> bool {
    matches!(
        rest.iter().find(|c| !c.is_whitespace()),
        Some('}') | Some(']')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_object_parses_directly() {
        let value = parse_lenient(r#"{"a": 1, "b": [true, null]}"#, Shape::Object).unwrap();
        assert_eq!(value, json!({"a": 1, "b": [true, null]}));
    }

    #[test]
    fn test_trailing_commas_removed() {
        let value = parse_lenient(r#"{"a": [1, 2, ], "b": {"c": 3,},}"#, Shape::Object).unwrap();
        assert_eq!(value, json!({"a": [1, 2], "b": {"c": 3}}));
    }

    #[test]
    fn test_commas_inside_strings_preserved() {
        let value = parse_lenient(r#"{"a": "x, }", "b": [1,],}"#, Shape::Object).unwrap();
        assert_eq!(value, json!({"a": "x, }", "b": [1]}));
    }

    #[test]
    fn test_typographic_quotes_normalized() {
        let text = "{\u{201C}summary\u{201D}: \u{201C}Strong match\u{201D}, \"n\": 2}";
        let value = parse_lenient(text, Shape::Object).unwrap();
        assert_eq!(value, json!({"summary": "Strong match", "n": 2}));
    }

    #[test]
    fn test_typographic_quotes_inside_straight_strings_kept() {
        let text = "{\"quote\": \"he said \u{201C}hi\u{201D}\", \"n\": 1,}";
        let value = parse_lenient(text, Shape::Object).unwrap();
        assert_eq!(value["quote"], "he said \u{201C}hi\u{201D}");
    }

    #[test]
    fn test_object_recovered_from_prose() {
        let embedded = json!({"name": "Ada", "skills": ["rust", "sql"], "nested": {"k": [1, 2]}});
        let text = format!("Sure! Here is the analysis:\n{embedded}\nLet me know if you need more.");
        let value = parse_lenient(&text, Shape::Object).unwrap();
        assert_eq!(value, embedded);
    }

    #[test]
    fn test_array_recovered_from_prose() {
        let text = "Questions below:\n[{\"question\": \"Why Rust?\"},]\nGood luck";
        let value = parse_lenient(text, Shape::Array).unwrap();
        assert_eq!(value, json!([{"question": "Why Rust?"}]));
    }

    #[test]
    fn test_array_recovered_from_wrapping_object() {
        let text = r#"{"questions": [{"question": "Q1"}, {"question": "Q2"}]}"#;
        let value = parse_lenient(text, Shape::Array).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_type_mismatch_is_malformed() {
        let err = parse_lenient("[1, 2, 3]", Shape::Object).unwrap_err();
        assert!(err.reason.contains("object"), "reason: {}", err.reason);
    }

    #[test]
    fn test_scalar_is_malformed_for_array() {
        let err = parse_lenient("\"just a string\"", Shape::Array).unwrap_err();
        assert!(err.reason.contains("no JSON array"), "reason: {}", err.reason);
    }

    #[test]
    fn test_garbage_is_malformed_with_excerpt() {
        let raw = "I'm sorry, I cannot help with that request.";
        let err = parse_lenient(raw, Shape::Object).unwrap_err();
        assert_eq!(err.excerpt, raw);
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let err = parse_lenient(r#"{"a": {"b": 1}"#, Shape::Object).unwrap_err();
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let value = parse_lenient(r#"{"a": "say \"hi\",",}"#, Shape::Object).unwrap();
        assert_eq!(value["a"], "say \"hi\",");
    }
}

//! Payload resolution.
//!
//! Transports hand back whatever the endpoint produced. These helpers reduce
//! it to plain text and then, for feed replies, to the `reply` field.

use haru_core::generation::GenerationError;
use serde_json::Value as JsonValue;

/// Reduces a response body to one string.
///
/// Accepted shapes, in order: a bare string, `{"text": ..}`,
/// `{"aiResponse": ..}`, `candidates[0].content.parts[0].text`. Anything else
/// is returned as its JSON text.
pub fn extract_text(value: &JsonValue) -> String {
    if let Some(text) = value.as_str() {
        return text.to_string();
    }

    for field in ["text", "aiResponse"] {
        if let Some(text) = value.get(field).and_then(JsonValue::as_str) {
            return text.to_string();
        }
    }

    if let Some(text) = value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(JsonValue::as_str)
    {
        return text.to_string();
    }

    value.to_string()
}

/// Removes a surrounding markdown code fence (with or without a language
/// tag) and trims whitespace.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Extracts the reply from a feed generation.
///
/// - `{"reply": "..."}` yields the reply
/// - a JSON string yields the string
/// - text that is not JSON yields the text itself
///
/// A JSON value without a usable reply is unparseable, which sends the
/// chain on to its next transport.
pub fn parse_feed_reply(raw: &str) -> Result<String, GenerationError> {
    let text = strip_code_fence(raw);
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let reply = match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Object(object)) => match object.get("reply") {
            Some(JsonValue::String(reply)) => reply.trim().to_string(),
            _ => {
                return Err(GenerationError::Unparseable(
                    "JSON object has no string `reply` field".into(),
                ));
            }
        },
        Ok(JsonValue::String(reply)) => reply.trim().to_string(),
        Ok(other) => {
            return Err(GenerationError::Unparseable(format!(
                "expected a reply object, got {}",
                other
            )));
        }
        Err(_) => text.to_string(),
    };

    if reply.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(reply)
}

/// Extracts the text of a chat turn.
///
/// Text that looks like a JSON object with a `text` or `reply` field yields
/// that field; everything else is used as-is.
pub fn parse_chat_text(raw: &str) -> Result<String, GenerationError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Ok(JsonValue::Object(object)) = serde_json::from_str::<JsonValue>(trimmed) {
            for field in ["text", "reply"] {
                if let Some(text) = object.get(field).and_then(JsonValue::as_str) {
                    return non_empty(text);
                }
            }
        }
    }
    non_empty(trimmed)
}

fn non_empty(text: &str) -> Result<String, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_shapes() {
        assert_eq!(extract_text(&json!("plain")), "plain");
        assert_eq!(extract_text(&json!({ "text": "t" })), "t");
        assert_eq!(extract_text(&json!({ "aiResponse": "a" })), "a");
        assert_eq!(
            extract_text(&json!({
                "candidates": [{ "content": { "parts": [{ "text": "c" }] } }]
            })),
            "c"
        );
        assert_eq!(extract_text(&json!({ "reply": "r" })), r#"{"reply":"r"}"#);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"reply\":\"x\"}\n```"), "{\"reply\":\"x\"}");
        assert_eq!(strip_code_fence("```\nhi\n```"), "hi");
        assert_eq!(strip_code_fence("  no fence  "), "no fence");
    }

    #[test]
    fn test_parse_feed_reply() {
        assert_eq!(parse_feed_reply(r#"{"reply":"hi"}"#).unwrap(), "hi");
        assert_eq!(parse_feed_reply("```json\n{\"reply\": \"fenced\"}\n```").unwrap(), "fenced");
        assert_eq!(parse_feed_reply("yo").unwrap(), "yo");
        assert_eq!(parse_feed_reply(r#""quoted""#).unwrap(), "quoted");
    }

    #[test]
    fn test_parse_feed_reply_failures() {
        assert!(matches!(
            parse_feed_reply(r#"{"answer":"x"}"#),
            Err(GenerationError::Unparseable(_))
        ));
        assert!(matches!(parse_feed_reply("[1,2]"), Err(GenerationError::Unparseable(_))));
        assert_eq!(parse_feed_reply("   "), Err(GenerationError::EmptyResponse));
        assert_eq!(parse_feed_reply(r#"{"reply":""}"#), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_parse_chat_text() {
        assert_eq!(parse_chat_text("hello there").unwrap(), "hello there");
        assert_eq!(parse_chat_text(r#"{"text":"wrapped"}"#).unwrap(), "wrapped");
        assert_eq!(parse_chat_text(r#"{"reply":"also"}"#).unwrap(), "also");
        assert_eq!(parse_chat_text("{not json}").unwrap(), "{not json}");
        assert_eq!(parse_chat_text(""), Err(GenerationError::EmptyResponse));
    }
}

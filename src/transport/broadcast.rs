use serde::{Deserialize, Serialize};

use crate::domain::MessageText;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct BroadcastBody<'a> {
    messages: Vec<TextMessageObject<'a>>,
}

#[derive(Debug, Serialize)]
struct TextMessageObject<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// API error payload returned by the LINE Messaging API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub property: Option<String>,
}

/// Encode the JSON body for `POST /v2/bot/message/broadcast` carrying a
/// single text message object.
pub fn encode_broadcast_body(text: &MessageText) -> String {
    let body = BroadcastBody {
        messages: vec![TextMessageObject {
            kind: "text",
            text: text.as_str(),
        }],
    };
    // Serialization of these borrowed structs cannot fail.
    serde_json::to_string(&body).unwrap_or_default()
}

/// Decode the LINE error body (`{"message": ..., "details": [...]}`).
pub fn decode_error_body(body: &str) -> Result<ApiErrorBody, TransportError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_single_text_message_object() {
        let text = MessageText::new("hello").unwrap();
        let body = encode_broadcast_body(&text);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["messages"][0]["type"], "text");
        assert_eq!(parsed["messages"][0]["text"], "hello");
        assert_eq!(parsed["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn encode_preserves_literal_text() {
        let text = MessageText::new("line1\nline2 \"quoted\"").unwrap();
        let body = encode_broadcast_body(&text);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["messages"][0]["text"], "line1\nline2 \"quoted\"");
    }

    #[test]
    fn decode_error_body_with_details() {
        let body = r#"
        {
          "message": "The request body has 1 error(s)",
          "details": [
            { "message": "May not be empty", "property": "messages[0].text" }
          ]
        }
        "#;
        let parsed = decode_error_body(body).unwrap();
        assert_eq!(parsed.message, "The request body has 1 error(s)");
        assert_eq!(parsed.details.len(), 1);
        assert_eq!(
            parsed.details[0].property.as_deref(),
            Some("messages[0].text")
        );
    }

    #[test]
    fn decode_error_body_without_details() {
        let parsed = decode_error_body(r#"{"message":"Invalid reply token"}"#).unwrap();
        assert_eq!(parsed.message, "Invalid reply token");
        assert!(parsed.details.is_empty());
    }

    #[test]
    fn decode_rejects_invalid_json() {
        assert!(matches!(
            decode_error_body("{ not json }"),
            Err(TransportError::Json(_))
        ));
    }
}

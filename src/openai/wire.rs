//! Serde wire types for the three generation endpoints.
//!
//! Request bodies are built as typed structs and serialised with
//! `serde_json`, which escapes every control character (backslash, quote,
//! newline, carriage return, tab) in embedded strings — the transport
//! boundary's escaping duty lives here, in-core, not in the prompt
//! composer. The tests at the bottom pin that behaviour.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Chat completion (/v1/chat/completions)
// ---------------------------------------------------------------------------

/// One chat message, request or response side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A `role: "user"` message carrying `content`.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One completion choice in the chat response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response body for the chat-completions endpoint.
///
/// `choices` defaults to empty when absent so that a missing sequence and an
/// empty one fail through the same parser path.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

// ---------------------------------------------------------------------------
// Image generation (/v1/images/generations)
// ---------------------------------------------------------------------------

/// Request body for the image-generation endpoint. One image per request.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub n: u32,
    pub size: String,
}

/// One generated image in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDatum {
    pub url: String,
}

/// Response body for the image-generation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

// ---------------------------------------------------------------------------
// Speech synthesis (/v1/audio/speech)
// ---------------------------------------------------------------------------

/// Request body for the speech endpoint. The response is a raw byte stream,
/// not JSON, so there is no typed response counterpart.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    pub input: String,
    pub model: String,
    pub voice: String,
    pub response_format: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_request_with(content: &str) -> ChatRequest {
        ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![ChatMessage::user(content)],
            max_tokens: 300,
            temperature: 0.7,
        }
    }

    #[test]
    fn chat_request_serialises_expected_fields() {
        let body = serde_json::to_string(&chat_request_with("hello")).unwrap();
        assert!(body.contains("\"model\":\"gpt-3.5-turbo\""));
        assert!(body.contains("\"role\":\"user\""));
        assert!(body.contains("\"content\":\"hello\""));
        assert!(body.contains("\"max_tokens\":300"));
    }

    /// All five control characters the transport boundary must escape.
    #[test]
    fn control_characters_are_escaped_in_serialised_body() {
        let raw = "back\\slash \"quote\" line\nbreak carriage\rreturn tab\there";
        let body = serde_json::to_string(&chat_request_with(raw)).unwrap();

        assert!(body.contains(r"back\\slash"));
        assert!(body.contains(r#"\"quote\""#));
        assert!(body.contains(r"line\nbreak"));
        assert!(body.contains(r"carriage\rreturn"));
        assert!(body.contains(r"tab\there"));

        // No literal control bytes may survive inside the JSON document.
        assert!(!body.contains('\n'));
        assert!(!body.contains('\r'));
        assert!(!body.contains('\t'));

        // The escaped body must round-trip to the original text.
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["messages"][0]["content"], raw);
    }

    #[test]
    fn image_request_carries_prompt_count_and_size() {
        let req = ImageRequest {
            prompt: "a tower".into(),
            n: 1,
            size: "512x512".into(),
        };
        let body = serde_json::to_string(&req).unwrap();
        assert!(body.contains("\"prompt\":\"a tower\""));
        assert!(body.contains("\"n\":1"));
        assert!(body.contains("\"size\":\"512x512\""));
    }

    #[test]
    fn speech_request_escapes_input_text() {
        let req = SpeechRequest {
            input: "line one\nline two".into(),
            model: "tts-1".into(),
            voice: "onyx".into(),
            response_format: "wav".into(),
        };
        let body = serde_json::to_string(&req).unwrap();
        assert!(body.contains(r"line one\nline two"));
        assert!(body.contains("\"voice\":\"onyx\""));
    }

    #[test]
    fn chat_response_with_missing_choices_deserialises_empty() {
        let resp: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.choices.is_empty());

        let resp: ImageResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.data.is_empty());
    }
}

//! Gemini payload types

use serde::{Deserialize, Serialize};

/// Content container used in both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    /// System instructions carry no role.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// A single text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Request envelope for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

/// Response envelope for `generateContent`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` if the response
    /// carried no candidates or no text parts.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        if candidate.content.parts.is_empty() {
            return None;
        }
        Some(
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

/// One prior turn of the reading-companion chat, as supplied by the client.
///
/// Deserialization is lenient: the role defaults to `user`, and the text may
/// arrive under `text`, `message`, or `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, alias = "message", alias = "content")]
    pub text: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl ChatTurn {
    /// Collapse arbitrary caller roles onto Gemini's two-role model.
    pub fn gemini_role(&self) -> &'static str {
        match self.role.as_str() {
            "model" | "assistant" | "ai" | "bot" => "model",
            _ => "user",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"role": "model",
                "parts": [{"text": "a watercolor fox "}, {"text": "in a forest"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            response.text().as_deref(),
            Some("a watercolor fox in a forest")
        );
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_chat_turn_lenient_deserialization() {
        let turn: ChatTurn = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(turn.role, "user");
        assert_eq!(turn.text, "hello");

        let turn: ChatTurn = serde_json::from_str(r#"{"role": "ai", "text": "hi there"}"#).unwrap();
        assert_eq!(turn.gemini_role(), "model");
    }

    #[test]
    fn test_system_instruction_serializes_without_role() {
        let request = GenerateContentRequest {
            contents: vec![Content::user("hi")],
            system_instruction: Some(Content::system("be kind")),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
    }
}

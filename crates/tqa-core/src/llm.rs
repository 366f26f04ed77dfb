//! Provider traits for embedding and chat completion

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Result;

/// Role tag of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A generation request.
///
/// Temperature is always zero so that a fixed prompt yields a reproducible answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model_id: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

impl ChatRequest {
    /// Build a deterministic (zero temperature) request
    pub fn deterministic(model_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model_id: model_id.into(),
            messages,
            temperature: 0.0,
        }
    }
}

/// Trait for embedding providers
///
/// One call turns one input text into one fixed-length vector. Implementations
/// report transport and provider failures as `Error::EmbeddingService`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single input text
    async fn embed(&self, input: &str) -> Result<Vec<f64>>;

    /// Get the embedding model ID being used
    fn embedding_model(&self) -> &str;
}

/// Trait for text generation providers
///
/// Implementations report transport, quota and malformed-response failures as
/// `Error::Synthesis`.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the messages and return the generated text
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_request_has_zero_temperature() {
        let request = ChatRequest::deterministic(
            "gpt-3.5-turbo",
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
        );
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].role, Role::User);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::user("hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);
    }
}

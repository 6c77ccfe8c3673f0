//! Completion API access
//!
//! The relay treats the completion API as a black box behind
//! [`CompletionClient`]; [`OpenAiClient`] talks to an OpenAI-compatible
//! `/chat/completions` endpoint.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A single chat message sent to the completion API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Completion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// Request carrying the whole prompt as one system message
    #[must_use]
    pub fn system(model: impl Into<String>, temperature: f32, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature,
            messages: vec![ChatMessage::system(prompt)],
        }
    }
}

/// Trait for completion API clients
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a completion and return the reply text
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or a
    /// response without reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Client name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_request_shape() {
        let request = CompletionRequest::system("gpt-4o-mini", 0.5, "prompt text");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "prompt text");
    }
}

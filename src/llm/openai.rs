//! `OpenAI` chat completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{CompletionClient, CompletionRequest};
use crate::config::LlmConfig;
use crate::{Error, Result};

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    endpoint: String,
}

impl OpenAiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Self::with_endpoint(
            config.api_key.clone(),
            format!("{}/chat/completions", config.base_url),
            config.timeout,
        )
    }

    /// Create a client posting to an explicit endpoint URL
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_endpoint(api_key: SecretString, endpoint: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("OpenAI API error: {status} - {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse OpenAI response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Upstream("OpenAI response had no reply content".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let config = LlmConfig {
            api_key: SecretString::new("sk-test".into()),
            base_url: "http://localhost:9000/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.5,
            timeout: Duration::from_secs(5),
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(client.name(), "openai");
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hi there"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hi there"));
    }

    #[test]
    fn test_parse_null_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}

//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use faq_relay::api::{self, ApiState};
use faq_relay::config::SessionConfig;
use faq_relay::{
    ChatService, ChatSettings, CompletionClient, CompletionRequest, Error, LinkFormatter, Result,
    SessionStore,
};
use tower::ServiceExt;

/// Completion client that replays scripted replies and records requests
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        })
    }

    /// Like [`ScriptedClient::new`] but every completion sleeps first
    pub fn delayed(replies: Vec<Result<String>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Every reply `Ok(reply_i)` for `i` in `0..n`
    pub fn numbered(n: usize) -> Arc<Self> {
        Self::new((0..n).map(|i| Ok(format!("reply {i}"))).collect())
    }

    /// Prompt text of each request, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages[0].content.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(Error::Upstream("no scripted reply".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Build API state around a scripted client
pub fn test_state(client: Arc<ScriptedClient>) -> Arc<ApiState> {
    let sessions = Arc::new(SessionStore::new(&SessionConfig::default()));
    let chat = ChatService::new(
        sessions,
        client,
        "SYSTEM",
        LinkFormatter::default(),
        ChatSettings {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.5,
            source_label: "The Ice Butcher Expertise".to_string(),
        },
    );
    Arc::new(ApiState::new(chat))
}

/// POST a JSON body and return the status plus parsed JSON response
pub async fn post_json(
    state: &Arc<ApiState>,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    post_raw(state, uri, &body.to_string()).await
}

/// POST a raw body labelled as JSON
pub async fn post_raw(
    state: &Arc<ApiState>,
    uri: &str,
    body: &str,
) -> (StatusCode, serde_json::Value) {
    let response = api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

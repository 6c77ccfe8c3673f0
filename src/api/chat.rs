//! Chat and end-session endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiState;
use crate::chat::ChatReply;
use crate::{Error, Result};

/// Body of `POST /api/chat`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Any JSON scalar; see [`session_key`]
    #[serde(default)]
    pub session_id: Option<Value>,
}

/// Body of `POST /api/end-session`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    #[serde(default)]
    pub session_id: Option<Value>,
}

/// Session key for a `sessionId` value
///
/// Strings are used as is; numbers and booleans by their JSON text, so `42`
/// and `"42"` name the same session. `null` means no id.
///
/// # Errors
///
/// Returns [`Error::InvalidSessionId`] for arrays and objects
pub fn session_key(value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(other) => Err(Error::InvalidSessionId(other.to_string())),
    }
}

/// Confirmation body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Relay one chat message to the model
async fn chat(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable chat body");
        Error::MissingMessage
    })?;

    let session_id = session_key(request.session_id)?;
    let reply = state
        .chat
        .respond(session_id.as_deref(), request.message.as_deref())
        .await?;

    Ok(Json(reply))
}

/// End a session and clear its history
async fn end_session(
    State(state): State<Arc<ApiState>>,
    payload: std::result::Result<Json<EndSessionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let request = payload.map_or_else(
        |rejection| {
            tracing::debug!(error = %rejection, "unreadable end-session body");
            EndSessionRequest::default()
        },
        |Json(request)| request,
    );

    // An array or object cannot name a stored session
    let session_id = session_key(request.session_id)
        .map_err(|_| Error::SessionNotFound(String::new()))?;
    state.chat.end_session(session_id.as_deref()).await?;

    Ok(Json(MessageResponse {
        message: "Session ended and history cleared.",
    }))
}

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/end-session", post(end_session))
        .with_state(state)
}

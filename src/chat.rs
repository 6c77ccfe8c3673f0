//! Chat turn orchestration
//!
//! One call to [`ChatService::respond`] is one request: validate, record the
//! user turn, render the prompt from the whole transcript, ask the completion
//! API, record the assistant turn, and format links in the reply.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::links::LinkFormatter;
use crate::llm::{CompletionClient, CompletionRequest};
use crate::prompt;
use crate::session::{Role, SessionStore};
use crate::{Error, Result};

/// Formatted reply to a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Reply with markdown links rendered as HTML
    pub message: String,
    /// Fixed attribution label
    pub source: String,
    /// Session the turn was recorded in
    pub session_id: String,
}

/// Completion settings applied to every turn
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub source_label: String,
}

/// Orchestrates chat turns over the session store and completion client
pub struct ChatService {
    sessions: Arc<SessionStore>,
    llm: Arc<dyn CompletionClient>,
    system_prompt: Arc<str>,
    formatter: LinkFormatter,
    settings: ChatSettings,
}

impl ChatService {
    #[must_use]
    pub fn new(
        sessions: Arc<SessionStore>,
        llm: Arc<dyn CompletionClient>,
        system_prompt: impl Into<Arc<str>>,
        formatter: LinkFormatter,
        settings: ChatSettings,
    ) -> Self {
        Self {
            sessions,
            llm,
            system_prompt: system_prompt.into(),
            formatter,
            settings,
        }
    }

    #[must_use]
    pub const fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Handle one chat message
    ///
    /// A missing or empty `session_id` starts a new session under a generated
    /// id, which is returned in the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMessage`] for an absent or empty message (the
    /// store is untouched), or [`Error::Upstream`] when the completion fails.
    /// The user turn stays recorded after an upstream failure.
    pub async fn respond(&self, session_id: Option<&str>, message: Option<&str>) -> Result<ChatReply> {
        let message = message.filter(|m| !m.is_empty()).ok_or(Error::MissingMessage)?;

        let session_id = match session_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                tracing::debug!(session_id = %id, "no session id supplied, generated one");
                id
            }
        };

        let handle = self.sessions.ensure(&session_id).await;
        let mut session = handle.lock().await;
        session.push(Role::User, message);

        let full_prompt = prompt::render_conversation(&self.system_prompt, session.turns());
        let request = CompletionRequest::system(
            self.settings.model.clone(),
            self.settings.temperature,
            full_prompt,
        );

        tracing::debug!(
            session_id = %session_id,
            turns = session.turns().len(),
            client = self.llm.name(),
            "requesting completion"
        );

        let reply = self.llm.complete(&request).await.map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "error processing chat");
            match e {
                Error::Upstream(_) => e,
                other => Error::Upstream(other.to_string()),
            }
        })?;

        session.push(Role::Assistant, reply.as_str());
        self.sessions.touch(&session_id, &handle).await;
        drop(session);

        Ok(ChatReply {
            message: self.formatter.format(&reply),
            source: self.settings.source_label.clone(),
            session_id,
        })
    }

    /// End a session and discard its transcript
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if there is no such session
    pub async fn end_session(&self, session_id: Option<&str>) -> Result<()> {
        let session_id = session_id.unwrap_or_default();
        self.sessions.end(session_id).await?;
        tracing::info!(session_id, "session ended and history cleared");
        Ok(())
    }
}

//! In-memory conversation sessions
//!
//! A session is an append-only transcript of user and assistant turns keyed
//! by a caller-supplied identifier. Sessions live in a bounded
//! [`SessionStore`] and are dropped on explicit end, idle expiry, or when the
//! store is full and they are the least recently used.

mod store;

pub use store::SessionStore;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Name used when rendering the transcript
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A conversation session
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    turns: Vec<Turn>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            turns: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Turns in append order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Append a turn to the end of the transcript
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
    }
}

/// Shared, lockable reference to a live session
///
/// Holding the lock serializes every mutation of the session, so a chat turn
/// that keeps the guard across the completion call cannot interleave with
/// another request for the same session.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<Mutex<Session>>);

impl SessionHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(Session::new(id))))
    }

    /// Wait for exclusive access to the session
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().await
    }

    /// Whether a request currently holds the session lock
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.try_lock().is_err()
    }

    /// Whether two handles point at the same session
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_renders_lowercase() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[tokio::test]
    async fn test_push_keeps_order() {
        let handle = SessionHandle::new("abc");
        {
            let mut session = handle.lock().await;
            session.push(Role::User, "hi");
            session.push(Role::Assistant, "hello");
        }

        let session = handle.lock().await;
        assert!(handle.is_busy());
        assert_eq!(session.id(), "abc");
        assert_eq!(
            session.turns(),
            &[Turn::new(Role::User, "hi"), Turn::new(Role::Assistant, "hello")]
        );
    }
}

//! Error types for the FAQ relay

use thiserror::Error;

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the relay
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat request carried no message text
    #[error("message is required")]
    MissingMessage,

    /// `sessionId` was an array or object
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Completion API failed or answered with an unexpected shape
    #[error("upstream error: {0}")]
    Upstream(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}


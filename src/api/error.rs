//! HTTP mapping of relay errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    /// HTTP status and client-facing message
    ///
    /// Server-side failures share one generic message so no upstream or
    /// internal detail reaches the caller.
    #[must_use]
    pub const fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingMessage => (StatusCode::BAD_REQUEST, "Message is required"),
            Self::SessionNotFound(_) => (StatusCode::BAD_REQUEST, "Session not found."),
            Self::InvalidSessionId(_) => (StatusCode::BAD_REQUEST, "Invalid session id"),
            Self::Config(_)
            | Self::Upstream(_)
            | Self::Io(_)
            | Self::Http(_)
            | Self::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        // Failures are logged where they happen, with their context
        tracing::debug!(status = status.as_u16(), error = %self, "request failed");
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

//! Error types for Chatbridge
//!
//! All errors implement `IntoResponse` for Axum handlers. Every failure
//! surfaces to the caller as a JSON body with a single `error` string.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Server misconfigured: OPENAI_API_KEY missing")]
    MissingCredential,

    /// Upstream rejected the request. The status and message are the
    /// upstream's own and are propagated to the caller verbatim.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream request timed out after {timeout_seconds} seconds")]
    UpstreamTimeout { timeout_seconds: u64 },

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MissingCredential => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::Upstream { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                message.clone(),
            ),
            // Transport and timeout details are logged at the call site but
            // never surfaced to the caller.
            Self::UpstreamTimeout { .. }
            | Self::Transport(_)
            | Self::Internal(_)
            | Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

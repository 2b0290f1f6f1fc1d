//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Credential status: "configured" or "missing"
    pub credential_status: &'static str,
}

/// Health check handler
///
/// Returns 200 OK with service status and credential status. The credential
/// status surfaces the one misconfiguration that makes every relay request
/// fail, so operators can catch it before callers do.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let credential_status = if state.config().upstream.api_key().is_some() {
        "configured"
    } else {
        "missing"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            credential_status,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::extract::State;
    use std::str::FromStr;
    use std::sync::Arc;

    fn create_test_state(with_key: bool) -> AppState {
        let key_line = if with_key { "api_key = \"sk-test\"" } else { "" };
        let toml = format!(
            r#"
[server]
host = "127.0.0.1"
port = 3000

[upstream]
base_url = "http://localhost:9000/v1"
model = "test-model"
{key_line}
"#
        );
        let config = Config::from_str(&toml).expect("should parse test config");
        AppState::new(Arc::new(config)).expect("should create AppState")
    }

    #[tokio::test]
    async fn test_health_handler_returns_ok() {
        let state = create_test_state(true);
        let (status, Json(body)) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "OK");
        assert_eq!(body.credential_status, "configured");
    }

    #[tokio::test]
    async fn test_health_handler_reports_missing_credential() {
        let state = create_test_state(false);
        let (status, Json(body)) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.credential_status, "missing");
    }
}

//! Metrics endpoint
//!
//! Exposes the Prometheus registry in text format for scraping.

use crate::error::AppError;
use crate::handlers::AppState;
use axum::extract::State;

/// GET /metrics handler
pub async fn handler(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics()
        .encode()
        .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::str::FromStr;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_metrics_handler_returns_text_exposition() {
        let config = Config::from_str(
            r#"
[server]
host = "127.0.0.1"
port = 3000

[upstream]
base_url = "http://localhost:9000/v1"
"#,
        )
        .expect("should parse test config");
        let state = AppState::new(Arc::new(config)).expect("should create AppState");

        state
            .metrics()
            .record_request(crate::metrics::Outcome::Ok)
            .expect("should record outcome");

        let body = handler(State(state)).await.expect("should encode metrics");
        assert!(body.contains("chatbridge_requests_total"));
    }
}

//! Upstream completion client
//!
//! Owns the single outbound HTTP call per relay request: serialize the
//! assembled message sequence, POST it to the completion endpoint with
//! bearer authentication, and translate the response (success, upstream
//! rejection, transport failure, timeout) into the application error
//! taxonomy.

pub mod prompt;
pub mod types;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use self::types::{
    ChatMessage, ErrorEnvelope, GENERIC_UPSTREAM_ERROR, ResponsesBody, ResponsesRequest,
};
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the upstream completion endpoint
///
/// Holds a shared connection pool; cheap to clone via `AppState`. The
/// client never retries: every relay request maps to exactly one outbound
/// call, and failures are terminal for that request.
pub struct RelayClient {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl RelayClient {
    /// Create a new relay client
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Forward the assembled conversation upstream and return the reply text
    ///
    /// The whole exchange (connection, request, response body) is bounded by
    /// `server.request_timeout_seconds`; expiry is an internal error, never
    /// a partial reply. The response body is parsed as JSON regardless of
    /// HTTP status, because the upstream carries structured error bodies on
    /// non-2xx responses.
    pub async fn send(
        &self,
        input: &[ChatMessage],
        api_key: &str,
        request_id: RequestId,
    ) -> AppResult<String> {
        let url = format!("{}/responses", self.config.upstream.base_url());
        let payload = ResponsesRequest {
            model: self.config.upstream.model(),
            input,
        };
        let timeout_seconds = self.config.server.request_timeout_seconds;

        tracing::debug!(
            request_id = %request_id,
            model = %self.config.upstream.model(),
            input_length = input.len(),
            timeout_seconds = timeout_seconds,
            "Forwarding conversation upstream"
        );

        let exchange = async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        request_id = %request_id,
                        url = %url,
                        error = %e,
                        "Upstream request failed to complete"
                    );
                    AppError::Transport(format!("request to upstream failed: {}", e))
                })?;

            let status = response.status();
            let bytes = response.bytes().await.map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    status = %status,
                    error = %e,
                    "Failed to read upstream response body"
                );
                AppError::Transport(format!("failed to read upstream body: {}", e))
            })?;

            if !status.is_success() {
                // Non-2xx responses still carry a JSON error body in this
                // protocol; a garbled body degrades to the generic message.
                let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                    .map(ErrorEnvelope::into_message)
                    .unwrap_or_else(|_| GENERIC_UPSTREAM_ERROR.to_string());

                tracing::warn!(
                    request_id = %request_id,
                    status = %status,
                    message = %message,
                    "Upstream rejected the request"
                );
                return Err(AppError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: ResponsesBody = serde_json::from_slice(&bytes).map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    error = %e,
                    "Upstream returned a success status with an unparseable body"
                );
                AppError::Transport(format!("invalid upstream response body: {}", e))
            })?;

            Ok(body.into_payload().into_text())
        };

        match tokio::time::timeout(Duration::from_secs(timeout_seconds), exchange).await {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::error!(
                    request_id = %request_id,
                    url = %url,
                    timeout_seconds = timeout_seconds,
                    "Upstream request timed out"
                );
                Err(AppError::UpstreamTimeout { timeout_seconds })
            }
        }
    }
}

//! Chat relay endpoint handler
//!
//! Handles POST /api/chat: validate the inbound conversation, prepend the
//! configured system prompt, forward the result upstream, and return the
//! generated text.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::handlers::extractor::ApiJson;
use crate::metrics::Outcome;
use crate::middleware::RequestId;
use crate::upstream::prompt::{assemble_input, render_system_prompt};
use crate::upstream::types::ChatMessage;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};

/// Chat request from the frontend client
///
/// Validation is enforced during deserialization - invalid instances cannot
/// exist. `messages` must be a non-empty sequence of message-like objects;
/// the remaining fields feed the system prompt and are optional.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl ChatRequest {
    /// Get the caller's conversation, in the order it was sent
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Get the caller-supplied user name, if any
    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Get the caller-supplied dimension, if any
    pub fn dimension(&self) -> Option<&str> {
        self.dimension.as_deref()
    }

    /// Get the caller-supplied reply language, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Custom Deserialize implementation that validates during deserialization
impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawChatRequest {
            messages: Vec<ChatMessage>,
            #[serde(rename = "userName")]
            user_name: Option<String>,
            dimension: Option<String>,
            language: Option<String>,
        }

        let raw = RawChatRequest::deserialize(deserializer)?;

        if raw.messages.is_empty() {
            return Err(serde::de::Error::custom(
                "'messages' must be a non-empty array",
            ));
        }

        Ok(ChatRequest {
            messages: raw.messages,
            user_name: raw.user_name,
            dimension: raw.dimension,
            language: raw.language,
        })
    }
}

/// Chat reply to the client
///
/// The only success shape this endpoint ever returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    reply: String,
}

impl ChatReply {
    /// Create a new reply
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    /// Get the reply text
    pub fn reply(&self) -> &str {
        &self.reply
    }
}

/// POST /api/chat handler
///
/// Terminal states per request: bad request (rejected during extraction,
/// before this handler runs), misconfigured (no credential, no outbound
/// call), upstream error (provider status propagated), internal error
/// (transport/timeout/parse failure), or ok. The outbound call is the sole
/// suspension point; there are no retries.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    tracing::debug!(
        request_id = %request_id,
        message_count = request.messages().len(),
        user_name = request.user_name().unwrap_or("<none>"),
        dimension = request.dimension().unwrap_or("<none>"),
        "Received chat request"
    );

    // Credential check happens per request, not at startup: the server is
    // allowed to boot without a key and report the misconfiguration to
    // callers until the operator provides one.
    let Some(api_key) = state.config().upstream.api_key() else {
        tracing::error!(request_id = %request_id, "OPENAI_API_KEY is not set");
        record_outcome(&state, request_id, Outcome::Misconfigured);
        return Err(AppError::MissingCredential);
    };

    let system = render_system_prompt(
        &state.config().prompt,
        request.user_name(),
        request.dimension(),
        request.language(),
    );
    let input = assemble_input(system, request.messages());

    let upstream_start = std::time::Instant::now();
    let result = state.relay().send(&input, api_key, request_id).await;
    let upstream_duration_ms = upstream_start.elapsed().as_secs_f64() * 1000.0;
    state.metrics().observe_upstream_duration(upstream_duration_ms);

    match result {
        Ok(reply) => {
            tracing::info!(
                request_id = %request_id,
                reply_length = reply.len(),
                upstream_duration_ms = %upstream_duration_ms,
                "Relay request completed successfully"
            );
            record_outcome(&state, request_id, Outcome::Ok);
            Ok(Json(ChatReply::new(reply)))
        }
        Err(e) => {
            let outcome = match &e {
                AppError::Upstream { .. } => Outcome::UpstreamError,
                _ => Outcome::InternalError,
            };
            record_outcome(&state, request_id, outcome);
            Err(e)
        }
    }
}

/// Record the request outcome, logging on failure
///
/// Metrics recording errors indicate a programming bug (invalid labels) but
/// must never fail the request itself.
fn record_outcome(state: &AppState, request_id: RequestId, outcome: Outcome) {
    if let Err(e) = state.metrics().record_request(outcome) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            outcome = outcome.as_str(),
            "Metrics recording failed (non-fatal), request will continue"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::types::Role;

    #[test]
    fn test_chat_request_deserializes() {
        let json = r#"{"messages": [{"role": "user", "content": "Hello!"}]}"#;
        let req: ChatRequest = serde_json::from_str(json).expect("should deserialize");

        assert_eq!(req.messages().len(), 1);
        assert_eq!(req.messages()[0].role(), Role::User);
        assert_eq!(req.messages()[0].content(), "Hello!");
        assert_eq!(req.user_name(), None);
        assert_eq!(req.dimension(), None);
        assert_eq!(req.language(), None);
    }

    #[test]
    fn test_chat_request_with_context_fields() {
        let json = r#"{
            "messages": [{"role": "user", "content": "Hi"}],
            "userName": "Dana",
            "dimension": "leadership",
            "language": "Hebrew"
        }"#;
        let req: ChatRequest = serde_json::from_str(json).expect("should deserialize");

        assert_eq!(req.user_name(), Some("Dana"));
        assert_eq!(req.dimension(), Some("leadership"));
        assert_eq!(req.language(), Some("Hebrew"));
    }

    #[test]
    fn test_chat_request_rejects_missing_messages() {
        let json = r#"{"userName": "Dana"}"#;
        let result = serde_json::from_str::<ChatRequest>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_request_rejects_empty_messages() {
        let json = r#"{"messages": []}"#;
        let result = serde_json::from_str::<ChatRequest>(json);

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(
            err_msg.contains("non-empty"),
            "error message should mention non-empty, got: {}",
            err_msg
        );
    }

    #[test]
    fn test_chat_request_rejects_non_array_messages() {
        let json = r#"{"messages": "not an array"}"#;
        let result = serde_json::from_str::<ChatRequest>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_request_rejects_non_object_message_items() {
        let json = r#"{"messages": [42]}"#;
        let result = serde_json::from_str::<ChatRequest>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_request_coerces_null_content() {
        let json = r#"{"messages": [{"role": "user", "content": null}]}"#;
        let req: ChatRequest = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(req.messages()[0].content(), "");
    }

    #[test]
    fn test_chat_request_preserves_message_order() {
        let json = r#"{"messages": [
            {"role": "user", "content": "first"},
            {"role": "assistant", "content": "second"},
            {"role": "user", "content": "third"}
        ]}"#;
        let req: ChatRequest = serde_json::from_str(json).expect("should deserialize");

        let contents: Vec<&str> = req.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_chat_reply_serializes() {
        let reply = ChatReply::new("hello");
        let json = serde_json::to_string(&reply).expect("should serialize");
        assert_eq!(json, r#"{"reply":"hello"}"#);
    }

    #[test]
    fn test_chat_reply_allows_empty_text() {
        // An upstream body with no extractable text still yields a reply.
        let reply = ChatReply::new("");
        let json = serde_json::to_string(&reply).expect("should serialize");
        assert_eq!(json, r#"{"reply":""}"#);
    }
}

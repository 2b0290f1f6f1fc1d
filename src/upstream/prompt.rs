//! System prompt assembly
//!
//! Builds the synthesized system message that precedes the caller's
//! conversation in every outbound payload. The template text itself is
//! product content and comes from configuration; this module only owns the
//! interpolation and ordering rules.

use crate::config::PromptConfig;
use crate::upstream::types::ChatMessage;

/// Render the per-request system prompt
///
/// `{user_name}` and `{dimension}` placeholders in the configured template
/// are replaced with the request's values; absent or empty values fall back
/// to the configured defaults. When the request names a reply language, a
/// directive is appended so the model answers in it.
pub fn render_system_prompt(
    config: &PromptConfig,
    user_name: Option<&str>,
    dimension: Option<&str>,
    language: Option<&str>,
) -> ChatMessage {
    let user_name = non_empty(user_name).unwrap_or_else(|| config.default_user_name());
    let dimension = non_empty(dimension).unwrap_or_else(|| config.default_dimension());

    let mut content = config
        .template()
        .replace("{user_name}", user_name)
        .replace("{dimension}", dimension);

    if let Some(language) = non_empty(language) {
        content.push_str(&format!(" Reply in {}.", language));
    }

    ChatMessage::system(content)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Assemble the outbound message sequence
///
/// The system prompt is always element 0, followed by the caller's messages
/// in unmodified order. Roles and content are never reordered relative to
/// the inbound request.
pub fn assemble_input(system: ChatMessage, messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut input = Vec::with_capacity(messages.len() + 1);
    input.push(system);
    input.extend_from_slice(messages);
    input
}

//! Wire types for the upstream completion API
//!
//! Covers both directions of the relay: the message shape shared by the
//! inbound request and the outbound payload, and the two response shapes
//! the upstream API has used across its revisions (a top-level aggregated
//! text field, and a structured output list of typed content parts).

use serde::{Deserialize, Deserializer, Serialize};

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation
///
/// Used both for inbound caller messages and for the outbound payload sent
/// upstream. Deserialization coerces `content` to a string: absent or null
/// becomes the empty string, so the outbound payload never carries
/// non-string content. String content is passed through untouched,
/// preserving Unicode (including right-to-left scripts) byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Get the role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Get the content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl<'de> Deserialize<'de> for ChatMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawMessage {
            role: Role,
            #[serde(default)]
            content: Option<serde_json::Value>,
        }

        let raw = RawMessage::deserialize(deserializer)?;

        Ok(ChatMessage {
            role: raw.role,
            content: coerce_content(raw.content),
        })
    }
}

/// Coerce a JSON content value to a string
///
/// Absent and null become the empty string. Strings pass through unchanged.
/// Other JSON values are rendered in their display form so the upstream
/// payload always carries string content.
fn coerce_content(value: Option<serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// Outbound payload for `POST {base_url}/responses`
#[derive(Debug, Serialize)]
pub struct ResponsesRequest<'a> {
    pub model: &'a str,
    pub input: &'a [ChatMessage],
}

/// Raw upstream success body
///
/// Either or both of `output_text` and `output` may be present depending on
/// the API revision; `into_payload()` resolves them into a single
/// [`OutputPayload`].
#[derive(Debug, Deserialize)]
pub struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesBody {
    /// Resolve the raw body into the shape the upstream actually used
    ///
    /// A present but empty `output_text` does not count as aggregated text;
    /// extraction falls through to the structured list, matching the
    /// upstream's own aggregation semantics.
    pub fn into_payload(self) -> OutputPayload {
        match self.output_text {
            Some(text) if !text.is_empty() => OutputPayload::Aggregated(text),
            _ if !self.output.is_empty() => OutputPayload::Structured(self.output),
            _ => OutputPayload::Empty,
        }
    }
}

/// One item of the structured output list
#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

/// A typed content part within an output item
#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    kind: ContentKind,
    #[serde(default)]
    text: String,
}

/// Content part type tag
///
/// Only `output_text` parts carry reply text; everything else (refusals,
/// tool calls, future part types) is skipped during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    OutputText,
    #[serde(other)]
    Other,
}

/// The two upstream response shapes, resolved
///
/// Modeled as an explicit union so a future API revision becomes a new
/// variant here instead of another ad hoc fallback at the call site.
#[derive(Debug)]
pub enum OutputPayload {
    /// Top-level aggregated text field was present and non-empty
    Aggregated(String),
    /// No aggregated text; a structured output list was present
    Structured(Vec<OutputItem>),
    /// Neither shape carried text
    Empty,
}

impl OutputPayload {
    /// Extract the reply text
    ///
    /// Structured output concatenates the text of `output_text`-typed parts
    /// in their original order. An empty payload yields the empty string.
    pub fn into_text(self) -> String {
        match self {
            OutputPayload::Aggregated(text) => text,
            OutputPayload::Structured(items) => items
                .into_iter()
                .flat_map(|item| item.content)
                .filter(|part| part.kind == ContentKind::OutputText)
                .map(|part| part.text)
                .collect(),
            OutputPayload::Empty => String::new(),
        }
    }
}

/// Upstream error body `{ "error": { "message": ... } }`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Fallback message when the upstream error body carries no usable message
pub const GENERIC_UPSTREAM_ERROR: &str = "upstream request failed";

impl ErrorEnvelope {
    /// Get the upstream's stated error message, or the generic fallback
    pub fn into_message(self) -> String {
        self.error
            .and_then(|detail| detail.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string())
    }
}

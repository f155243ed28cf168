//! `OpenAI` API type mapping.
//!
//! Converts completion requests into the `chat/completions` wire format and
//! streamed chunks back into [`StreamEvent`]s.

use codemate_sdk::{CompletionRequest, Message, StreamEvent};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A message in the `OpenAI` wire format.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OpenAIMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

/// `OpenAI` API chat request format
#[derive(Debug, Serialize)]
pub struct OpenAIChatRequest {
    /// The model identifier
    pub model: String,
    /// The conversation, led by the system message
    pub messages: Vec<OpenAIMessage>,
    /// Always `true`
    pub stream: bool,
}

/// Creates a streaming `OpenAI` request from a completion request.
///
/// Non-empty system instructions become a leading `system` message.
#[must_use]
pub fn create_request(request: CompletionRequest) -> OpenAIChatRequest {
    let system = Some(request.system_instructions)
        .filter(|s| !s.trim().is_empty())
        .map(|content| OpenAIMessage {
            role: "system".to_string(),
            content,
        });

    let messages = system
        .into_iter()
        .chain(request.messages.into_iter().map(map_message))
        .collect();

    OpenAIChatRequest {
        model: request.model,
        messages,
        stream: true,
    }
}

fn map_message(message: Message) -> OpenAIMessage {
    OpenAIMessage {
        role: message.role.to_string(),
        content: message.content,
    }
}

/// One streamed chunk.
#[derive(Debug, Deserialize)]
pub struct OpenAIChunk {
    /// Incremental choices; only the first is used
    #[serde(default)]
    pub choices: Vec<OpenAIChunkChoice>,
    /// Set when the service fails mid-stream
    pub error: Option<OpenAIErrorBody>,
}

/// A choice within a chunk.
#[derive(Debug, Deserialize)]
pub struct OpenAIChunkChoice {
    /// Incremental content
    pub delta: Option<OpenAIDelta>,
    /// Complete message, sent by services that ignore `stream`
    pub message: Option<OpenAIDelta>,
}

/// Text carried by a delta or a whole message.
#[derive(Debug, Deserialize)]
pub struct OpenAIDelta {
    /// Answer text
    pub content: Option<String>,
    /// Reasoning text
    pub reasoning_content: Option<String>,
}

/// An error object.
#[derive(Debug, Deserialize)]
pub struct OpenAIErrorBody {
    /// Human-readable message
    pub message: String,
}

/// Maps one SSE `data:` payload to stream events.
///
/// Payloads that are not valid JSON are logged and skipped.
#[must_use]
pub fn map_chunk(data: &str) -> Vec<StreamEvent> {
    let chunk: OpenAIChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!(error = %e, data, "Failed to parse stream chunk");
            return Vec::new();
        }
    };

    if let Some(error) = chunk.error {
        return vec![StreamEvent::Error(error.message)];
    }

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Vec::new();
    };

    let mut events = Vec::new();
    if let Some(delta) = choice.delta {
        if let Some(thinking) = delta.reasoning_content.filter(|s| !s.is_empty()) {
            events.push(StreamEvent::Thinking(thinking));
        }
        if let Some(content) = delta.content.filter(|s| !s.is_empty()) {
            events.push(StreamEvent::Token(content));
        }
    }
    if let Some(content) = choice.message.and_then(|m| m.content) {
        events.push(StreamEvent::FinalResponse(content));
    }
    events
}

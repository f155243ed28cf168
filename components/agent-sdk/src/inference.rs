//! The streaming completion service seen from the agent loop.

use crate::error::InferenceError;
use crate::types::Message;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// One event of a streamed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental text chunk.
    Token(String),
    /// An incremental reasoning chunk, shown but never parsed.
    Thinking(String),
    /// The complete response text, sent by services that do not stream.
    FinalResponse(String),
    /// The service failed mid-stream.
    Error(String),
}

/// Request for a streamed chat completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The model to use for completion.
    pub model: String,
    /// Instructions sent ahead of the conversation.
    pub system_instructions: String,
    /// The conversation so far.
    pub messages: Vec<Message>,
}

/// Stream of completion events.
pub type CompletionStream = BoxStream<'static, StreamEvent>;

/// A chat completion service that streams its answer.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Opens a completion stream for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error when the stream cannot be opened.
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, InferenceError>;
}

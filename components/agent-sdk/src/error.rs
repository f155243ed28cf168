//! Error types for the Codemate SDK.
//!
//! This module provides a structured error hierarchy using `thiserror`.
//! File-operation and tool errors are recoverable: the executor turns them
//! into failed tool results that are fed back to the model. Inference errors
//! end the current request.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type returned by the agent loop.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The completion stream could not be opened or failed mid-stream.
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request itself is unusable (e.g. an empty user message).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors raised by the streaming completion service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Error reported by the model provider.
    #[error("Provider Error: {0}")]
    ProviderError(String),

    /// Rate limit exceeded.
    #[error("Rate Limit Exceeded")]
    RateLimit,

    /// Conversation exceeded the model's context window.
    #[error("Context Length Exceeded")]
    ContextLengthExceeded,

    /// Network error while talking to the provider.
    #[error("Network Error: {0}")]
    NetworkError(String),

    /// Client configuration error (bad URL, missing key).
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    /// No completion client has been initialized.
    #[error("Client not initialized. Please set an API key.")]
    NotInitialized,

    /// The stream delivered an error event.
    #[error("Stream Error: {0}")]
    Stream(String),
}

impl InferenceError {
    /// Returns `true` if this error is transient and a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit | Self::NetworkError(_) => true,
            Self::ProviderError(msg) => msg.starts_with("HTTP 5"),
            Self::ContextLengthExceeded
            | Self::ConfigError(_)
            | Self::NotInitialized
            | Self::Stream(_) => false,
        }
    }
}

/// Errors raised by the file operations engine.
///
/// Every variant is recoverable: it becomes a failed tool result.
#[derive(Error, Debug)]
pub enum FileOpError {
    /// No project root is open.
    #[error("No project folder is open.")]
    NoWorkspace,

    /// The path validator rejected the path.
    #[error("{reason}")]
    PathRejected {
        /// The raw path as supplied by the model.
        path: String,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// File or directory does not exist.
    #[error("File not found: {path}")]
    NotFound {
        /// The path as supplied by the model.
        path: String,
    },

    /// File exceeds the configured read limit.
    #[error(
        "File is too large ({}KB). Maximum readable size is {}KB.",
        kilobytes(*size),
        kilobytes(*max_size)
    )]
    TooLarge {
        /// The offending file.
        path: PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max_size: u64,
    },

    /// The edit search string does not occur in the file.
    #[error("Search content not found in {path}. Read the file again and retry with its current content.")]
    SearchContentAbsent {
        /// The edited path.
        path: String,
    },

    /// A glob pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern text.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// The edit was already applied or rejected.
    #[error("Edit for {path} was already {state}")]
    EditAlreadyResolved {
        /// The edited path.
        path: String,
        /// The terminal state the edit is in.
        state: String,
    },

    /// Any other I/O failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl FileOpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Rounds a byte count to whole kilobytes for user-facing messages.
fn kilobytes(bytes: u64) -> u64 {
    (bytes + 512) / 1024
}

/// Errors raised by the tool executor before an operation runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The tool name is not one of the known tools.
    #[error("Unknown tool: {name}")]
    UnknownTool {
        /// The name as written by the model.
        name: String,
    },

    /// The parameters do not decode into the tool's parameter record.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Name of the tool.
        tool: String,
        /// Decoder message.
        reason: String,
    },
}

/// Reasons a matched tool-call block was dropped by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// The block names a tool that does not exist.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// The parameter blob is not a JSON object.
    #[error("malformed parameters for '{tool}': {reason}")]
    MalformedParameters {
        /// The tool the block named.
        tool: String,
        /// Why the blob was rejected.
        reason: String,
    },
}

/// Errors related to configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration for '{key}': {value}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// The invalid value.
        value: String,
    },

    /// A blocklist pattern failed to compile.
    #[error("Invalid blocked pattern '{pattern}': {reason}")]
    InvalidBlockedPattern {
        /// The pattern text.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_mentions_both_sizes_in_kb() {
        let err = FileOpError::TooLarge {
            path: PathBuf::from("big.log"),
            size: 204_800,
            max_size: 100_000,
        };
        assert_eq!(
            err.to_string(),
            "File is too large (200KB). Maximum readable size is 98KB."
        );
    }

    #[test]
    fn test_unknown_tool_display() {
        let err = ToolError::UnknownTool {
            name: "delete_everything".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tool: delete_everything");
    }

    #[test]
    fn test_inference_error_is_retryable() {
        assert!(InferenceError::RateLimit.is_retryable());
        assert!(InferenceError::NetworkError("timeout".to_string()).is_retryable());
        assert!(InferenceError::ProviderError("HTTP 503: busy".to_string()).is_retryable());
        assert!(
            InferenceError::ProviderError("HTTP 529 <unknown status code>: x".to_string())
                .is_retryable()
        );
        assert!(
            !InferenceError::ProviderError("HTTP 401 Unauthorized: no".to_string()).is_retryable()
        );
        assert!(!InferenceError::ContextLengthExceeded.is_retryable());
        assert!(!InferenceError::Stream("boom".to_string()).is_retryable());
    }

    #[test]
    fn test_agent_error_from_inference() {
        let err: AgentError = InferenceError::RateLimit.into();
        assert_eq!(err.to_string(), "Inference failed: Rate Limit Exceeded");
    }
}

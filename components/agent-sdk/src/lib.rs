//! Codemate SDK - the agentic tool-calling loop of the Codemate assistant.
//!
//! The crate turns a language model into a coding agent confined to one
//! project folder: the model writes `<tool_call>` blocks, the SDK parses
//! them, runs the file tools, and feeds `<tool_result>` blocks back until the
//! model answers without calling a tool.
//!
//! # Features
//!
//! - **Path Validation**: every path is kept inside the project root and
//!   checked against a glob blocklist
//! - **File Operations**: read, write, edit, list and search with size limits
//! - **Tool Parsing**: lenient extraction of tool calls from free text
//! - **Diffs**: unified diffs for proposed edits
//! - **Agent Loop**: streaming, bounded, cancellable request loop
//! - **Approval**: edits are proposed and only written once approved
//!
//! # Example
//!
//! ```rust,no_run
//! use codemate_sdk::{AgentConfig, AgentLoopBuilder, CompletionSource, NullSink};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(source: Arc<dyn CompletionSource>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = AgentConfig::builder().max_iterations(5).build()?;
//!
//! let agent = AgentLoopBuilder::new()
//!     .source(source)
//!     .root("/path/to/project")
//!     .config(config)
//!     .build()?;
//!
//! let outcome = agent
//!     .run("Explain src/main.rs", &mut NullSink, &CancellationToken::new())
//!     .await?;
//! println!("{}", outcome.final_response);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]

pub mod approval;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod fs;
pub mod inference;
pub mod prompt;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use approval::{ApprovalDecision, ApprovalSink, review_edits};
pub use config::{AgentConfig, AgentConfigBuilder};
pub use diff::{DiffStats, unified_diff};
pub use engine::{
    AgentLoop, AgentLoopBuilder, DisplaySink, LoopOutcome, NullSink, StopReason, TaskInfo,
};
pub use error::{AgentError, ConfigError, FileOpError, InferenceError, ParseIssue, ToolError};
pub use fs::FileOperations;
pub use inference::{CompletionRequest, CompletionSource, CompletionStream, StreamEvent};
pub use prompt::PromptBuilder;
pub use tools::{PathValidation, PathValidator, ToolCallParser, ToolExecutor};
pub use types::{
    EditResult, EditState, FileInfo, Message, ParsedResponse, Role, SearchMatch, ToolCall,
    ToolName, ToolOutput, ToolResult,
};

/// Version of the SDK.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

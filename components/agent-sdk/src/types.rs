//! Core types for agent operations.

use crate::tools::constants;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a message in the conversation history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Identifies the role of a message sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// User input, including tool result feedback.
    User,
    /// Model output.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// The closed set of tools the model may invoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Read a file, optionally a line range.
    ReadFile,
    /// Create or overwrite a file.
    WriteFile,
    /// Propose a search-and-replace edit.
    EditFile,
    /// List entries matching a glob.
    ListFiles,
    /// Search file contents.
    SearchFiles,
}

impl ToolName {
    /// All tools, in catalogue order.
    pub const ALL: [ToolName; 5] = [
        ToolName::ReadFile,
        ToolName::WriteFile,
        ToolName::EditFile,
        ToolName::ListFiles,
        ToolName::SearchFiles,
    ];

    /// The wire identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::ReadFile => constants::fs::READ_FILE,
            ToolName::WriteFile => constants::fs::WRITE_FILE,
            ToolName::EditFile => constants::fs::EDIT_FILE,
            ToolName::ListFiles => constants::fs::LIST_FILES,
            ToolName::SearchFiles => constants::search::SEARCH_FILES,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = crate::error::ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::error::ToolError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// A tool invocation extracted from model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Opaque identifier, unique per invocation.
    pub id: String,
    /// Tool identifier as written by the model.
    pub name: String,
    /// Parameter object.
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    /// Creates a call with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        parameters: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: format!("tool_{}", uuid::Uuid::new_v4().simple()),
            name: name.into(),
            parameters,
        }
    }
}

/// Outcome of executing one tool call.
///
/// `result` is present iff `success`; `error` iff not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Id of the originating call.
    pub tool_call_id: String,
    /// Name of the originating call.
    pub tool_name: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolOutput>,
    /// Error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Creates a successful result.
    pub fn ok(call: &ToolCall, output: ToolOutput) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            success: true,
            result: Some(output),
            error: None,
        }
    }

    /// Creates a failed result.
    pub fn failed(call: &ToolCall, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Tool-specific success payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ToolOutput {
    /// File contents with line numbers.
    #[serde(rename_all = "camelCase")]
    FileContent {
        /// Root-relative path.
        path: String,
        /// Line-numbered text.
        content: String,
        /// Number of lines returned.
        line_count: usize,
        /// Whether only part of the file was returned.
        truncated: bool,
    },
    /// Plain confirmation text.
    Message {
        /// The confirmation.
        message: String,
    },
    /// Directory listing.
    #[serde(rename_all = "camelCase")]
    FileList {
        /// The listed directory.
        directory: String,
        /// Entries, sorted by path.
        files: Vec<FileInfo>,
        /// Number of entries returned.
        total_count: usize,
    },
    /// Search hits.
    #[serde(rename_all = "camelCase")]
    Search {
        /// The query text.
        query: String,
        /// Matching lines.
        matches: Vec<SearchMatch>,
        /// Number of matches returned.
        total_matches: usize,
    },
    /// A proposed edit.
    Edit(EditResult),
}

/// A directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File name.
    pub name: String,
    /// Root-relative path with `/` separators.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// Size in bytes.
    pub size: u64,
}

/// A single line matching a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Root-relative path.
    pub path: String,
    /// 1-based line number.
    pub line: usize,
    /// Trimmed, length-capped line text.
    pub content: String,
}

/// Lifecycle of a proposed edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    /// Computed but not written.
    Proposed,
    /// Written to disk.
    Applied,
    /// Discarded.
    Rejected,
}

impl fmt::Display for EditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditState::Proposed => write!(f, "proposed"),
            EditState::Applied => write!(f, "applied"),
            EditState::Rejected => write!(f, "rejected"),
        }
    }
}

/// A search-and-replace edit awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    /// Root-relative path of the edited file.
    pub path: String,
    /// File content before the edit.
    pub original_content: String,
    /// File content after the edit.
    pub new_content: String,
    /// Unified diff between the two.
    pub diff: String,
    /// Where the edit is in its lifecycle.
    pub state: EditState,
}

impl EditResult {
    /// Whether the edit has been written to disk.
    #[must_use]
    pub fn applied(&self) -> bool {
        self.state == EditState::Applied
    }
}

/// Model output split into prose and tool calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// Output with every tool-call block removed, trimmed.
    pub text_content: String,
    /// Valid calls in document order.
    pub tool_calls: Vec<ToolCall>,
}

impl ParsedResponse {
    /// Whether any tool call survived parsing.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

//! Tool name and markup constants.
//!
//! All tool names and block tags should be defined here and imported where
//! needed.

/// Tool names for file system operations.
pub mod fs {
    /// Read content from a file.
    pub const READ_FILE: &str = "read_file";

    /// Write content to a file.
    pub const WRITE_FILE: &str = "write_file";

    /// Propose a search-and-replace edit.
    pub const EDIT_FILE: &str = "edit_file";

    /// List directory contents.
    pub const LIST_FILES: &str = "list_files";
}

/// Tool names for search operations.
pub mod search {
    /// Search file contents.
    pub const SEARCH_FILES: &str = "search_files";
}

/// Tags of the tool-call and tool-result blocks.
pub mod tags {
    /// Opens a tool call.
    pub const TOOL_CALL_OPEN: &str = "<tool_call>";
    /// Closes a tool call.
    pub const TOOL_CALL_CLOSE: &str = "</tool_call>";
    /// Opens a tool result.
    pub const TOOL_RESULT_OPEN: &str = "<tool_result>";
    /// Closes a tool result.
    pub const TOOL_RESULT_CLOSE: &str = "</tool_result>";
}

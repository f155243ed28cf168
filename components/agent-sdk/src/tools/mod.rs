//! Tool system with Type-State pattern and security validation.

pub mod constants;
pub mod executor;
pub mod format;
pub mod parser;
pub mod request;
pub mod validation;

pub use executor::{ExecutionObserver, ToolExecutor};
pub use format::{
    CONTINUATION_PROMPT, describe_tool_call, format_tool_result, format_tool_results,
    summarize_tool_result,
};
pub use parser::ToolCallParser;
pub use request::{
    EditFileParams, ListFilesParams, ReadFileParams, SearchFilesParams, ToolRequest,
    WriteFileParams,
};
pub use validation::{PathValidation, PathValidator, SecureFilePath, Unvalidated, Validated};

//! Typed tool requests decoded from parsed calls.

use crate::error::ToolError;
use crate::types::{ToolCall, ToolName};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parameters of `read_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFileParams {
    /// File to read.
    pub path: String,
    /// First line, 1-based.
    #[serde(default)]
    pub start_line: Option<usize>,
    /// Last line, inclusive.
    #[serde(default)]
    pub end_line: Option<usize>,
}

/// Parameters of `write_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteFileParams {
    /// File to write.
    pub path: String,
    /// Full new content.
    pub content: String,
}

/// Parameters of `edit_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFileParams {
    /// File to edit.
    pub path: String,
    /// Exact text to find.
    pub search_content: String,
    /// Replacement text.
    pub replace_content: String,
}

/// Parameters of `list_files`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ListFilesParams {
    /// Directory to list.
    #[serde(default)]
    pub directory: Option<String>,
    /// Glob relative to the directory.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Parameters of `search_files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilesParams {
    /// Text to find, case-insensitively.
    pub query: String,
    /// Directory or file to search.
    #[serde(default)]
    pub path: Option<String>,
    /// Glob selecting files.
    #[serde(default)]
    pub file_pattern: Option<String>,
}

/// A tool call with its parameters decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    /// `read_file`
    ReadFile(ReadFileParams),
    /// `write_file`
    WriteFile(WriteFileParams),
    /// `edit_file`
    EditFile(EditFileParams),
    /// `list_files`
    ListFiles(ListFilesParams),
    /// `search_files`
    SearchFiles(SearchFilesParams),
}

impl ToolRequest {
    /// Decodes a parsed call.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTool` for a name outside the tool set and
    /// `InvalidArguments` when the parameters do not fit the tool.
    pub fn decode(call: &ToolCall) -> Result<Self, ToolError> {
        let name: ToolName = call.name.parse()?;
        let params = Value::Object(call.parameters.clone());

        Ok(match name {
            ToolName::ReadFile => Self::ReadFile(decode_params(name, params)?),
            ToolName::WriteFile => Self::WriteFile(decode_params(name, params)?),
            ToolName::EditFile => Self::EditFile(decode_params(name, params)?),
            ToolName::ListFiles => Self::ListFiles(decode_params(name, params)?),
            ToolName::SearchFiles => Self::SearchFiles(decode_params(name, params)?),
        })
    }

    /// The tool this request targets.
    #[must_use]
    pub fn name(&self) -> ToolName {
        match self {
            Self::ReadFile(_) => ToolName::ReadFile,
            Self::WriteFile(_) => ToolName::WriteFile,
            Self::EditFile(_) => ToolName::EditFile,
            Self::ListFiles(_) => ToolName::ListFiles,
            Self::SearchFiles(_) => ToolName::SearchFiles,
        }
    }
}

fn decode_params<T: DeserializeOwned>(name: ToolName, params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidArguments {
        tool: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn call(name: &str, params: Value) -> ToolCall {
        let Value::Object(map) = params else {
            return ToolCall::new(name, Map::new());
        };
        ToolCall::new(name, map)
    }

    #[test]
    fn test_decode_read_with_range() {
        let req = ToolRequest::decode(&call(
            "read_file",
            json!({"path": "a.rs", "startLine": 2, "endLine": 4}),
        ))
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::ReadFile(ReadFileParams {
                path: "a.rs".to_string(),
                start_line: Some(2),
                end_line: Some(4),
            })
        );
        assert_eq!(req.name(), ToolName::ReadFile);
    }

    #[test]
    fn test_decode_edit_uses_camel_case() {
        let req = ToolRequest::decode(&call(
            "edit_file",
            json!({"path": "a", "searchContent": "x", "replaceContent": "y"}),
        ))
        .unwrap();
        assert!(matches!(req, ToolRequest::EditFile(p) if p.search_content == "x"));
    }

    #[test]
    fn test_decode_list_without_params() {
        let req = ToolRequest::decode(&call("list_files", json!({}))).unwrap();
        assert_eq!(req, ToolRequest::ListFiles(ListFilesParams::default()));
    }

    #[test]
    fn test_decode_unknown_tool() {
        let err = ToolRequest::decode(&call("rm_rf", json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: rm_rf");
    }

    #[test]
    fn test_decode_missing_required_param() {
        let err = ToolRequest::decode(&call("write_file", json!({"path": "a"}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool, .. } if tool == "write_file"));
    }
}

//! Tool call parser for extracting invocations from model output.
//!
//! The model embeds calls as
//!
//! ```text
//! <tool_call>
//! <name>read_file</name>
//! <parameters>{"path": "src/main.rs"}</parameters>
//! </tool_call>
//! ```
//!
//! Blocks may appear anywhere in the prose and span multiple lines.

use crate::error::ParseIssue;
use crate::tools::constants::tags;
use crate::types::{ParsedResponse, ToolCall, ToolName};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt::Write;
use std::sync::LazyLock;
use tracing::warn;

/// Matches one tool-call block; group 1 is the name, group 2 the JSON blob.
static TOOL_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(
        r"(?s)<tool_call>\s*<name>(\w+)</name>\s*<parameters>(.*?)</parameters>\s*</tool_call>",
    ) {
        Ok(regex) => regex,
        Err(e) => panic!("regex pattern should be valid at compile time: {e}"),
    }
});

/// Extracts tool calls from model output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolCallParser;

impl ToolCallParser {
    /// Creates a parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Splits `output` into prose and valid tool calls.
    ///
    /// Blocks naming an unknown tool, or whose parameters are not a JSON
    /// object, are dropped with a warning. Every matched block is removed
    /// from the text whether or not it produced a call.
    #[must_use]
    pub fn parse(&self, output: &str) -> ParsedResponse {
        let mut tool_calls = Vec::new();
        let mut text = String::with_capacity(output.len());
        let mut cursor = 0;

        for caps in TOOL_CALL_PATTERN.captures_iter(output) {
            let Some(block) = caps.get(0) else { continue };
            text.push_str(&output[cursor..block.start()]);
            cursor = block.end();

            let name = caps.get(1).map_or("", |m| m.as_str());
            let blob = caps.get(2).map_or("", |m| m.as_str());

            match Self::decode(name, blob) {
                Ok(parameters) => tool_calls.push(ToolCall::new(name, parameters)),
                Err(issue) => warn!(%issue, "Dropping tool call block"),
            }
        }
        text.push_str(&output[cursor..]);

        ParsedResponse {
            text_content: text.trim().to_string(),
            tool_calls,
        }
    }

    fn decode(name: &str, blob: &str) -> Result<Map<String, Value>, ParseIssue> {
        if name.parse::<ToolName>().is_err() {
            return Err(ParseIssue::UnknownTool(name.to_string()));
        }

        match serde_json::from_str::<Value>(blob.trim()) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ParseIssue::MalformedParameters {
                tool: name.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
            Err(e) => Err(ParseIssue::MalformedParameters {
                tool: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Renders one call in the block format `parse` accepts.
    ///
    /// `<` only occurs inside JSON strings, so writing it as `\u003c` keeps
    /// the parameters intact while no value can close the block early.
    #[must_use]
    pub fn embed(name: &str, parameters: &Map<String, Value>) -> String {
        let json = Value::Object(parameters.clone())
            .to_string()
            .replace('<', "\\u003c");
        format!(
            "{open}\n<name>{name}</name>\n<parameters>{json}</parameters>\n{close}",
            open = tags::TOOL_CALL_OPEN,
            close = tags::TOOL_CALL_CLOSE,
        )
    }

    /// Renders several calls, one block per line.
    #[must_use]
    pub fn embed_all(calls: &[ToolCall]) -> String {
        let mut out = String::new();
        for (i, call) in calls.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{}", Self::embed(&call.name, &call.parameters));
        }
        out
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test parameters must be an object"),
        }
    }

    #[test]
    fn test_parse_single_call() {
        let output = "Let me look at that file.\n<tool_call>\n<name>read_file</name>\n<parameters>{\"path\": \"src/main.rs\", \"startLine\": 3}</parameters>\n</tool_call>";
        let parsed = ToolCallParser::new().parse(output);

        assert!(parsed.has_tool_calls());
        assert_eq!(parsed.text_content, "Let me look at that file.");
        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].name, "read_file");
        assert_eq!(parsed.tool_calls[0].parameters["startLine"], json!(3));
    }

    #[test]
    fn test_plain_text_has_no_calls() {
        let parsed = ToolCallParser::new().parse("  The answer is 42.  ");
        assert!(!parsed.has_tool_calls());
        assert_eq!(parsed.text_content, "The answer is 42.");
    }

    #[test]
    fn test_calls_keep_document_order() {
        let output = format!(
            "{}\nthen\n{}",
            ToolCallParser::embed("list_files", &params(json!({"directory": "src"}))),
            ToolCallParser::embed("search_files", &params(json!({"query": "fn main"}))),
        );
        let parsed = ToolCallParser::new().parse(&output);

        let names: Vec<_> = parsed.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["list_files", "search_files"]);
        assert_eq!(parsed.text_content, "then");
        assert_ne!(parsed.tool_calls[0].id, parsed.tool_calls[1].id);
    }

    #[test]
    fn test_unknown_tool_is_dropped_and_stripped() {
        let output = "before <tool_call><name>delete_file</name><parameters>{\"path\": \"a\"}</parameters></tool_call> after";
        let parsed = ToolCallParser::new().parse(output);

        assert!(!parsed.has_tool_calls());
        assert_eq!(parsed.text_content, "before  after");
    }

    #[test]
    fn test_malformed_json_is_dropped_but_siblings_survive() {
        let output = "<tool_call><name>read_file</name><parameters>{not json}</parameters></tool_call>\n<tool_call><name>read_file</name><parameters>{\"path\": \"ok.txt\"}</parameters></tool_call>";
        let parsed = ToolCallParser::new().parse(output);

        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].parameters["path"], json!("ok.txt"));
        assert!(parsed.text_content.is_empty());
    }

    #[test]
    fn test_non_object_parameters_are_dropped() {
        let output = "<tool_call><name>read_file</name><parameters>[1, 2]</parameters></tool_call>";
        assert!(!ToolCallParser::new().parse(output).has_tool_calls());
    }

    #[test]
    fn test_parameters_may_span_lines() {
        let output = "<tool_call>\n  <name>write_file</name>\n  <parameters>\n{\n  \"path\": \"a.txt\",\n  \"content\": \"x\\ny\"\n}\n  </parameters>\n</tool_call>";
        let parsed = ToolCallParser::new().parse(output);
        assert_eq!(parsed.tool_calls[0].parameters["content"], json!("x\ny"));
    }

    #[test]
    fn test_embed_all_round_trips() {
        let calls = vec![
            ToolCall::new(
                "write_file",
                params(json!({"path": "a.txt", "content": "line 1\nline 2 \"quoted\""})),
            ),
            ToolCall::new(
                "edit_file",
                params(json!({"path": "b.txt", "searchContent": "x", "replaceContent": "y"})),
            ),
            ToolCall::new(
                "write_file",
                params(json!({
                    "path": "docs/protocol.md",
                    "content": "Example: </parameters></tool_call> ends a block",
                })),
            ),
        ];
        let parsed = ToolCallParser::new().parse(&ToolCallParser::embed_all(&calls));

        assert_eq!(parsed.tool_calls.len(), calls.len());
        for (got, want) in parsed.tool_calls.iter().zip(&calls) {
            assert_eq!(got.name, want.name);
            assert_eq!(got.parameters, want.parameters);
        }
        assert!(parsed.text_content.is_empty());
    }
}

//! Prompt building utilities for the agent loop.

use crate::config::AgentConfig;
use crate::tools::ToolCallParser;
use crate::types::ToolName;
use serde_json::{Map, Value, json};
use std::fmt::Write;

/// Builder for constructing system prompts.
#[derive(Debug, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds the system instructions for a request.
    ///
    /// Host instructions from `config.instructions` are appended last.
    #[must_use]
    pub fn build_system_prompt(config: &AgentConfig) -> String {
        let mut prompt = format!(
            r"You are a coding assistant working inside the user's project folder.
You can inspect and change files in that folder by calling tools.

## Available Tools

{catalogue}

## How to Call a Tool

Write one block per call, anywhere in your reply:

{example}

- `<parameters>` must contain a single JSON object.
- You can call several tools in one reply. They run in the order written.
- Paths are relative to the project folder. Files outside it, secrets and
  dependency folders cannot be accessed.

## Rules

1. Read a file before editing it, and copy `searchContent` exactly from the
   current content.
2. Use one `edit_file` call per change; `searchContent` must be unique enough
   to identify a single location.
3. Edits are proposed to the user and applied only after approval.
4. Results come back as `<tool_result>` blocks. Check `<success>` before
   relying on an `<output>`; an `<error>` tells you what to fix. Inside a
   result, `<\/output>`, `<\/error>` and `<\/tool_result>` stand for the
   same text without the backslash.
5. You have at most {budget} rounds of tool calls. When you are done, answer
   without any tool call.",
            catalogue = Self::tool_catalogue(),
            example = Self::example_call(),
            budget = config.max_iterations,
        );

        if let Some(extra) = config
            .instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let _ = write!(prompt, "\n\n## Additional Instructions\n\n{extra}");
        }

        prompt
    }

    /// Describes every tool and its parameters.
    #[must_use]
    pub fn tool_catalogue() -> String {
        ToolName::ALL
            .iter()
            .map(|tool| format!("- `{tool}`: {}", Self::describe(*tool)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn describe(tool: ToolName) -> &'static str {
        match tool {
            ToolName::ReadFile => {
                "Read a file with line numbers. Parameters: `path`, optional `startLine` and `endLine` (1-based, inclusive)."
            }
            ToolName::WriteFile => {
                "Create or overwrite a file. Parameters: `path`, `content` (the full file)."
            }
            ToolName::EditFile => {
                "Replace the first occurrence of `searchContent` with `replaceContent` in the file at `path`."
            }
            ToolName::ListFiles => {
                "List files. Parameters: optional `directory` (default `.`) and glob `pattern` (default `*`)."
            }
            ToolName::SearchFiles => {
                "Case-insensitive text search. Parameters: `query`, optional `path` and glob `filePattern` (default `**/*`)."
            }
        }
    }

    fn example_call() -> String {
        let params: Map<String, Value> = match json!({"path": "src/main.rs", "startLine": 1, "endLine": 40}) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        ToolCallParser::embed(ToolName::ReadFile.as_str(), &params)
    }
}

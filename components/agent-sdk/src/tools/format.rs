//! Rendering of tool results for the model and for display.

use crate::tools::constants::tags;
use crate::types::{ToolCall, ToolName, ToolOutput, ToolResult};
use std::borrow::Cow;
use std::fmt::Write;

/// Closing tags that would end a result block early if they appeared in a body.
const RESERVED_CLOSERS: [&str; 3] = ["</output>", "</error>", "</tool_result>"];

/// Appended after a batch of results to prompt the next step.
pub const CONTINUATION_PROMPT: &str = "Continue with the task using these results. \
Call more tools if you need to, otherwise give your final answer.";

/// Renders one result as a `<tool_result>` block.
#[must_use]
pub fn format_tool_result(result: &ToolResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tags::TOOL_RESULT_OPEN);
    let _ = writeln!(out, "<tool_call_id>{}</tool_call_id>", result.tool_call_id);
    let _ = writeln!(out, "<tool_name>{}</tool_name>", result.tool_name);
    let _ = writeln!(out, "<success>{}</success>", result.success);

    match (&result.result, &result.error) {
        (Some(output), _) if result.success => {
            let body = render_output(output);
            let _ = writeln!(out, "<output>\n{}\n</output>", escape_body(&body));
        }
        (_, Some(error)) => {
            let _ = writeln!(out, "<error>{}</error>", escape_body(error));
        }
        _ => {}
    }

    out.push_str(tags::TOOL_RESULT_CLOSE);
    out
}

/// Renders a batch of results followed by the continuation prompt.
#[must_use]
pub fn format_tool_results(results: &[ToolResult]) -> String {
    let mut blocks: Vec<String> = results.iter().map(format_tool_result).collect();
    blocks.push(CONTINUATION_PROMPT.to_string());
    blocks.join("\n\n")
}

/// Writes reserved closing tags inside a body as `<\/tag>`.
fn escape_body(body: &str) -> Cow<'_, str> {
    if !RESERVED_CLOSERS.iter().any(|tag| body.contains(tag)) {
        return Cow::Borrowed(body);
    }
    let mut escaped = body.to_string();
    for tag in RESERVED_CLOSERS {
        escaped = escaped.replace(tag, &format!("<\\/{}", &tag[2..]));
    }
    Cow::Owned(escaped)
}

fn render_output(output: &ToolOutput) -> String {
    match output {
        ToolOutput::FileContent {
            path,
            content,
            line_count,
            truncated,
        } => {
            let partial = if *truncated { "(partial view)\n" } else { "" };
            format!("File: {path}\nLines: {line_count}\n{partial}\n{content}")
        }
        ToolOutput::Message { message } => message.clone(),
        ToolOutput::Edit(edit) => format!("File: {}\nChanges:\n{}", edit.path, edit.diff),
        ToolOutput::FileList {
            directory,
            files,
            total_count,
        } => {
            let mut out = format!("Directory: {directory}\n{total_count} entries\n");
            for file in files {
                let kind = if file.is_directory { "dir " } else { "file" };
                let _ = write!(out, "\n  [{kind}] {}", file.path);
            }
            out
        }
        ToolOutput::Search {
            query,
            matches,
            total_matches,
        } => {
            if matches.is_empty() {
                return format!("No results for \"{query}\"");
            }
            let mut out = format!("{total_matches} results for \"{query}\"\n");
            for m in matches {
                let _ = write!(out, "\n  {}:{}: {}", m.path, m.line, m.content);
            }
            out
        }
    }
}

/// One-line description of a call for activity displays.
#[must_use]
pub fn describe_tool_call(call: &ToolCall) -> String {
    let param = |key: &str| {
        call.parameters
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    match call.name.parse::<ToolName>() {
        Ok(ToolName::ReadFile) => format!("Reading {}", param("path")),
        Ok(ToolName::WriteFile) => format!("Writing {}", param("path")),
        Ok(ToolName::EditFile) => format!("Editing {}", param("path")),
        Ok(ToolName::ListFiles) => {
            let dir = param("directory");
            format!("Listing {}", if dir.is_empty() { "." } else { dir.as_str() })
        }
        Ok(ToolName::SearchFiles) => format!("Searching for \"{}\"", param("query")),
        Err(_) => format!("Calling {}", call.name),
    }
}

/// One-line summary of a result for activity displays.
#[must_use]
pub fn summarize_tool_result(result: &ToolResult) -> String {
    if !result.success {
        return format!("Error: {}", result.error.as_deref().unwrap_or("unknown error"));
    }

    match &result.result {
        Some(ToolOutput::FileContent {
            path, line_count, ..
        }) => format!("{path} ({line_count} lines)"),
        Some(ToolOutput::Message { message }) => message.clone(),
        Some(ToolOutput::Edit(edit)) => format!("Edit ready for {}", edit.path),
        Some(ToolOutput::FileList {
            directory,
            total_count,
            ..
        }) => format!("{directory}: {total_count} entries"),
        Some(ToolOutput::Search {
            query,
            total_matches,
            ..
        }) => format!("\"{query}\": {total_matches} results"),
        None => "Done".to_string(),
    }
}

//! Progress events emitted by the agent loop.

use crate::types::{ToolCall, ToolResult};

/// Longest task title, including the ellipsis.
const TITLE_MAX_CHARS: usize = 50;

/// The task opened on the first tool-bearing turn of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    /// Unique task id.
    pub id: String,
    /// Short title derived from the user message.
    pub title: String,
    /// What the model said it is about to do.
    pub description: String,
}

impl TaskInfo {
    pub(crate) fn new(user_message: &str, prose: &str) -> Self {
        let description = if prose.trim().is_empty() {
            user_message.trim()
        } else {
            prose.trim()
        };

        Self {
            id: format!("task_{}", uuid::Uuid::new_v4().simple()),
            title: title_from(user_message),
            description: description.to_string(),
        }
    }
}

/// First line of `message`, shortened to fit the title limit.
fn title_from(message: &str) -> String {
    let first_line = message.trim().lines().next().unwrap_or_default().trim();
    if first_line.chars().count() <= TITLE_MAX_CHARS {
        return first_line.to_string();
    }
    let kept: String = first_line.chars().take(TITLE_MAX_CHARS - 3).collect();
    format!("{}...", kept.trim_end())
}

/// Receives the progress of one request.
///
/// Every method defaults to doing nothing.
pub trait DisplaySink: Send {
    /// A streamed text chunk.
    fn on_token(&mut self, _token: &str) {}

    /// A streamed reasoning chunk.
    fn on_thinking(&mut self, _thinking: &str) {}

    /// The first tool-bearing turn opened a task.
    fn on_task_start(&mut self, _task: &TaskInfo) {}

    /// The open task ended. Fires once per started task, on every exit.
    fn on_task_complete(&mut self, _task: &TaskInfo) {}

    /// A tool call is about to run.
    fn on_tool_call(&mut self, _call: &ToolCall) {}

    /// A tool call finished.
    fn on_tool_result(&mut self, _call: &ToolCall, _result: &ToolResult) {}

    /// The request finished with this answer. Fires at most once.
    fn on_complete(&mut self, _final_response: &str) {}

    /// The completion service failed.
    fn on_error(&mut self, _message: &str) {}
}

/// A sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {}

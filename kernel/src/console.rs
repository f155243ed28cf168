//! Terminal rendering of agent progress.

use codemate_sdk::tools::{describe_tool_call, summarize_tool_result};
use codemate_sdk::{DisplaySink, TaskInfo, ToolCall, ToolResult};
use std::io::Write;

/// Streams the answer and tool activity to a writer.
///
/// Write errors are ignored: a closed terminal must not abort the request.
#[derive(Debug)]
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    show_thinking: bool,
    mid_line: bool,
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W, show_thinking: bool) -> Self {
        Self {
            out,
            show_thinking,
            mid_line: false,
        }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if self.mid_line {
            let _ = writeln!(self.out);
            self.mid_line = false;
        }
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    fn chunk(&mut self, text: &str) {
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
        self.mid_line = !text.ends_with('\n');
    }
}

impl<W: Write + Send> DisplaySink for ConsoleSink<W> {
    fn on_token(&mut self, token: &str) {
        self.chunk(token);
    }

    fn on_thinking(&mut self, thinking: &str) {
        if self.show_thinking {
            self.chunk(thinking);
        }
    }

    fn on_task_start(&mut self, task: &TaskInfo) {
        self.line(&format!("== {} ==", task.title));
    }

    fn on_task_complete(&mut self, task: &TaskInfo) {
        self.line(&format!("== done: {} ==", task.title));
    }

    fn on_tool_call(&mut self, call: &ToolCall) {
        self.line(&format!("  > {}", describe_tool_call(call)));
    }

    fn on_tool_result(&mut self, _call: &ToolCall, result: &ToolResult) {
        let mark = if result.success { "ok" } else { "failed" };
        self.line(&format!("    {mark}: {}", summarize_tool_result(result)));
    }

    fn on_complete(&mut self, _final_response: &str) {
        if self.mid_line {
            let _ = writeln!(self.out);
            self.mid_line = false;
        }
    }

    fn on_error(&mut self, message: &str) {
        self.line(&format!("error: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemate_sdk::ToolOutput;
    use serde_json::{Map, json};

    fn call() -> ToolCall {
        let params: Map<String, serde_json::Value> = json!({"path": "a.txt", "content": "x"})
            .as_object()
            .cloned()
            .unwrap();
        ToolCall::new("write_file", params)
    }

    #[test]
    fn test_activity_starts_on_a_fresh_line() {
        let mut sink = ConsoleSink::new(Vec::new(), false);
        sink.on_token("Let me write it.");
        let call = call();
        sink.on_tool_call(&call);
        sink.on_tool_result(
            &call,
            &ToolResult::ok(
                &call,
                ToolOutput::Message {
                    message: "File written: a.txt".to_string(),
                },
            ),
        );
        sink.on_token("Done");
        sink.on_complete("Done");

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "Let me write it.\n  > Writing a.txt\n    ok: File written: a.txt\nDone\n"
        );
    }

    #[test]
    fn test_thinking_hidden_by_default() {
        let mut sink = ConsoleSink::new(Vec::new(), false);
        sink.on_thinking("secret plan");
        sink.on_error("Rate Limit Exceeded");
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "error: Rate Limit Exceeded\n");
    }
}

//! Tool executor for running parsed calls against the file tools.

use crate::error::FileOpError;
use crate::fs::FileOperations;
use crate::tools::request::ToolRequest;
use crate::types::{ToolCall, ToolOutput, ToolResult};
use std::time::Instant;
use tracing::debug;

/// Hooks around each executed call.
pub trait ExecutionObserver {
    /// Called before a call runs.
    fn on_start(&mut self, _call: &ToolCall) {}

    /// Called after a call finished, successfully or not.
    fn on_complete(&mut self, _call: &ToolCall, _result: &ToolResult) {}
}

impl ExecutionObserver for () {}

/// Runs tool calls sequentially against a [`FileOperations`] engine.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    files: FileOperations,
}

impl ToolExecutor {
    /// Creates an executor over `files`.
    #[must_use]
    pub fn new(files: FileOperations) -> Self {
        Self { files }
    }

    /// The underlying file operations.
    #[must_use]
    pub fn files(&self) -> &FileOperations {
        &self.files
    }

    /// Executes every call in order and returns one result per call.
    ///
    /// A failing call never stops the batch. Calls touching the same file see
    /// each other's effects in document order.
    pub fn execute_all(
        &self,
        calls: &[ToolCall],
        observer: &mut dyn ExecutionObserver,
    ) -> Vec<ToolResult> {
        calls
            .iter()
            .map(|call| {
                observer.on_start(call);
                let result = self.execute(call);
                observer.on_complete(call, &result);
                result
            })
            .collect()
    }

    /// Executes a single call.
    #[must_use]
    pub fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let result = match ToolRequest::decode(call) {
            Ok(request) => match self.dispatch(request) {
                Ok(output) => ToolResult::ok(call, output),
                Err(e) => ToolResult::failed(call, e.to_string()),
            },
            Err(e) => ToolResult::failed(call, e.to_string()),
        };

        debug!(
            tool = %call.name,
            id = %call.id,
            success = result.success,
            elapsed_ms = start.elapsed().as_millis(),
            "Tool call executed"
        );
        result
    }

    fn dispatch(&self, request: ToolRequest) -> Result<ToolOutput, FileOpError> {
        match request {
            ToolRequest::ReadFile(p) => self.files.read(&p.path, p.start_line, p.end_line),
            ToolRequest::WriteFile(p) => self.files.write(&p.path, &p.content),
            ToolRequest::EditFile(p) => {
                self.files
                    .edit(&p.path, &p.search_content, &p.replace_content)
            }
            ToolRequest::ListFiles(p) => {
                self.files
                    .list(p.directory.as_deref(), p.pattern.as_deref())
            }
            ToolRequest::SearchFiles(p) => self.files.search(
                &p.query,
                p.path.as_deref(),
                p.file_pattern.as_deref(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::test_support::project;
    use serde_json::{Value, json};

    fn call(name: &str, params: Value) -> ToolCall {
        match params {
            Value::Object(map) => ToolCall::new(name, map),
            _ => panic!("params must be an object"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ExecutionObserver for Recorder {
        fn on_start(&mut self, call: &ToolCall) {
            self.events.push(format!("start {}", call.name));
        }

        fn on_complete(&mut self, call: &ToolCall, result: &ToolResult) {
            self.events.push(format!("done {} {}", call.name, result.success));
        }
    }

    #[test]
    fn test_partial_failure_is_isolated() {
        let (_dir, ops) = project(&[("a.txt", "a"), ("c.txt", "c")]);
        let executor = ToolExecutor::new(ops);
        let calls = vec![
            call("read_file", json!({"path": "a.txt"})),
            call("read_file", json!({"path": "missing.txt"})),
            call("read_file", json!({"path": "c.txt"})),
        ];

        let results = executor.execute_all(&calls, &mut ());

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("File not found: missing.txt"));
        assert!(results[1].result.is_none());
        assert!(results[2].success);
        for (call, result) in calls.iter().zip(&results) {
            assert_eq!(call.id, result.tool_call_id);
        }
    }

    #[test]
    fn test_unknown_tool_and_bad_arguments() {
        let (_dir, ops) = project(&[]);
        let executor = ToolExecutor::new(ops);
        let results = executor.execute_all(
            &[
                call("format_disk", json!({})),
                call("read_file", json!({"path": 42})),
            ],
            &mut (),
        );

        assert_eq!(results[0].error.as_deref(), Some("Unknown tool: format_disk"));
        assert!(results[1]
            .error
            .as_deref()
            .unwrap()
            .starts_with("Invalid arguments for tool 'read_file'"));
    }

    #[test]
    fn test_batch_applies_in_order() {
        let (_dir, ops) = project(&[]);
        let executor = ToolExecutor::new(ops);
        let mut recorder = Recorder::default();
        let results = executor.execute_all(
            &[
                call("write_file", json!({"path": "n.txt", "content": "fresh"})),
                call("read_file", json!({"path": "n.txt"})),
            ],
            &mut recorder,
        );

        assert!(results.iter().all(|r| r.success));
        assert_eq!(
            recorder.events,
            vec![
                "start write_file",
                "done write_file true",
                "start read_file",
                "done read_file true"
            ]
        );
        match &results[1].result {
            Some(ToolOutput::FileContent { content, .. }) => assert_eq!(content, "   1│ fresh"),
            other => panic!("unexpected result {other:?}"),
        }
    }
}

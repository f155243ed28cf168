//! Shared test utilities for integration tests.
//!
//! Provides temp projects, a scripted completion source and a sink that
//! records every callback.

#![allow(dead_code)]

use async_trait::async_trait;
use codemate_sdk::{
    AgentConfig, CompletionRequest, CompletionSource, CompletionStream, DisplaySink,
    FileOperations, InferenceError, StreamEvent, TaskInfo, ToolCall, ToolExecutor, ToolResult,
};
use futures::StreamExt;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Creates a temp project root containing `files`.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }
    dir
}

/// An executor over `root` with the given configuration.
pub fn executor(root: &Path, config: &AgentConfig) -> ToolExecutor {
    ToolExecutor::new(FileOperations::new(Some(root.to_path_buf()), config).unwrap())
}

/// Builds a `<tool_call>` block.
pub fn tool_call(name: &str, params: serde_json::Value) -> String {
    format!("<tool_call>\n<name>{name}</name>\n<parameters>{params}</parameters>\n</tool_call>")
}

/// A tool call value for direct execution.
pub fn call(name: &str, params: serde_json::Value) -> ToolCall {
    let params = params.as_object().cloned().unwrap_or_default();
    ToolCall::new(name, params)
}

/// Replays one text turn per request, repeating the last.
pub struct ScriptedSource {
    turns: Vec<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedSource {
    pub fn new<S: Into<String>>(turns: impl IntoIterator<Item = S>) -> Self {
        Self {
            turns: turns.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionSource for ScriptedSource {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, InferenceError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let text = self
            .turns
            .get(idx)
            .or_else(|| self.turns.last())
            .cloned()
            .unwrap_or_default();
        // Split into small chunks so token accumulation is exercised.
        let tokens: Vec<StreamEvent> = text
            .chars()
            .collect::<Vec<_>>()
            .chunks(7)
            .map(|c| StreamEvent::Token(c.iter().collect()))
            .collect();
        Ok(futures::stream::iter(tokens).boxed())
    }
}

/// Records every sink callback by name.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<String>,
    pub results: Vec<ToolResult>,
}

impl DisplaySink for RecordingSink {
    fn on_task_start(&mut self, task: &TaskInfo) {
        self.events.push(format!("task_start:{}", task.title));
    }
    fn on_task_complete(&mut self, _task: &TaskInfo) {
        self.events.push("task_complete".to_string());
    }
    fn on_tool_call(&mut self, call: &ToolCall) {
        self.events.push(format!("tool_call:{}", call.name));
    }
    fn on_tool_result(&mut self, _call: &ToolCall, result: &ToolResult) {
        self.events.push(format!("tool_result:{}", result.success));
        self.results.push(result.clone());
    }
    fn on_complete(&mut self, _final_response: &str) {
        self.events.push("complete".to_string());
    }
    fn on_error(&mut self, message: &str) {
        self.events.push(format!("error:{message}"));
    }
}

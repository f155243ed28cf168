//! The agentic tool-calling loop.
//!
//! One request alternates between asking the model and running the tool
//! calls it wrote, until the model answers without calling a tool or the
//! iteration budget runs out.

use crate::config::AgentConfig;
use crate::engine::events::{DisplaySink, TaskInfo};
use crate::engine::state::LoopState;
use crate::error::{AgentError, InferenceError};
use crate::inference::{CompletionRequest, CompletionSource, StreamEvent};
use crate::tools::{ToolCallParser, ToolExecutor, format_tool_results};
use crate::types::{EditResult, Message, ToolCall, ToolResult};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Answer used when the budget ran out before the model said anything.
pub const BUDGET_EXHAUSTED_RESPONSE: &str =
    "Task completed. (Reached the maximum number of tool iterations.)";

/// Why a request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model answered without calling a tool.
    Completed,
    /// The iteration budget ran out.
    BudgetExhausted,
    /// The caller cancelled the request.
    Cancelled,
}

/// Result of one request.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// The answer shown to the user.
    pub final_response: String,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
    /// Number of model requests made.
    pub iterations: u32,
    /// The full conversation, starting with the user message.
    pub conversation: Vec<Message>,
    /// Edits awaiting the host's approval, in proposal order.
    pub proposed_edits: Vec<EditResult>,
}

/// Core loop that orchestrates model turns and tool execution.
pub struct AgentLoop {
    pub(crate) source: Arc<dyn CompletionSource>,
    pub(crate) executor: Arc<ToolExecutor>,
    pub(crate) parser: ToolCallParser,
    pub(crate) config: AgentConfig,
    pub(crate) system_instructions: String,
}

impl std::fmt::Debug for AgentLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLoop")
            .field("executor", &self.executor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentLoop {
    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The executor running tool calls.
    #[must_use]
    pub fn executor(&self) -> &ToolExecutor {
        &self.executor
    }

    /// The system instructions sent with every model request.
    #[must_use]
    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    /// Runs one user request to completion.
    ///
    /// Progress is reported to `sink`. `cancel` is checked before each model
    /// request and between stream events. Tool calls run one at a time on the
    /// blocking thread pool, so this must be polled inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for a blank message and `Inference` when the
    /// completion service fails. Tool failures are not errors: they are fed
    /// back to the model.
    pub async fn run(
        &self,
        user_message: &str,
        sink: &mut dyn DisplaySink,
        cancel: &CancellationToken,
    ) -> Result<LoopOutcome, AgentError> {
        if user_message.trim().is_empty() {
            return Err(AgentError::InvalidRequest(
                "User message cannot be empty".to_string(),
            ));
        }

        let mut state = LoopState::new(user_message, self.config.max_iterations);
        info!(
            model = %self.config.model,
            budget = self.config.max_iterations,
            "Agent request started"
        );

        loop {
            if state.remaining == 0 {
                warn!(iterations = state.iteration, "Tool iteration budget exhausted");
                if state.final_response.is_empty() {
                    state.final_response = BUDGET_EXHAUSTED_RESPONSE.to_string();
                }
                return Ok(Self::finish(state, sink, StopReason::BudgetExhausted));
            }

            if cancel.is_cancelled() {
                return Ok(Self::finish(state, sink, StopReason::Cancelled));
            }

            state.iteration += 1;
            debug!(
                iteration = state.iteration,
                remaining = state.remaining,
                "Requesting model turn"
            );

            let text = match self.model_turn(&state, sink, cancel).await {
                Ok(Some(text)) => text,
                Ok(None) => return Ok(Self::finish(state, sink, StopReason::Cancelled)),
                Err(e) => {
                    warn!(error = %e, "Completion failed");
                    sink.on_error(&e.to_string());
                    if let Some(task) = &state.task {
                        sink.on_task_complete(task);
                    }
                    return Err(AgentError::Inference(e));
                }
            };

            let parsed = self.parser.parse(&text);
            if !parsed.has_tool_calls() {
                state.append_response(&parsed.text_content);
                return Ok(Self::finish(state, sink, StopReason::Completed));
            }

            if state.task.is_none() {
                let task = TaskInfo::new(&state.user_message, &parsed.text_content);
                sink.on_task_start(&task);
                state.task = Some(task);
            }
            state.append_response(&parsed.text_content);

            debug!(calls = parsed.tool_calls.len(), "Executing tool batch");
            let results = self.execute_batch(&parsed.tool_calls, sink).await;
            state.collect_edits(&results);
            state.add_turn(text, format_tool_results(&results));
            state.remaining -= 1;
        }
    }

    /// Runs `calls` in order, each on the blocking pool.
    async fn execute_batch(
        &self,
        calls: &[ToolCall],
        sink: &mut dyn DisplaySink,
    ) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            sink.on_tool_call(call);
            let executor = Arc::clone(&self.executor);
            let job = call.clone();
            let result = match tokio::task::spawn_blocking(move || executor.execute(&job)).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool task did not finish");
                    ToolResult::failed(call, format!("Tool execution aborted: {e}"))
                }
            };
            sink.on_tool_result(call, &result);
            results.push(result);
        }
        results
    }

    /// Streams one model response and returns its text, or `None` when
    /// cancelled mid-stream.
    async fn model_turn(
        &self,
        state: &LoopState,
        sink: &mut dyn DisplaySink,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, InferenceError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system_instructions: self.system_instructions.clone(),
            messages: state.history.clone(),
        };
        let mut stream = self.source.stream_completion(request).await?;

        let mut tokens = String::new();
        let mut final_response = None;
        while let Some(event) = stream.next().await {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            match event {
                StreamEvent::Token(token) => {
                    sink.on_token(&token);
                    tokens.push_str(&token);
                }
                StreamEvent::Thinking(thinking) => sink.on_thinking(&thinking),
                StreamEvent::FinalResponse(message) => final_response = Some(message),
                StreamEvent::Error(message) => return Err(InferenceError::Stream(message)),
            }
        }

        if tokens.is_empty() {
            Ok(Some(final_response.unwrap_or_default()))
        } else {
            Ok(Some(tokens))
        }
    }

    fn finish(
        state: LoopState,
        sink: &mut dyn DisplaySink,
        stop_reason: StopReason,
    ) -> LoopOutcome {
        if stop_reason != StopReason::Cancelled {
            sink.on_complete(&state.final_response);
        }
        if let Some(task) = &state.task {
            sink.on_task_complete(task);
        }

        info!(
            ?stop_reason,
            iterations = state.iteration,
            proposed_edits = state.proposed_edits.len(),
            "Agent request finished"
        );

        LoopOutcome {
            final_response: state.final_response,
            stop_reason,
            iterations: state.iteration,
            conversation: state.history,
            proposed_edits: state.proposed_edits,
        }
    }
}

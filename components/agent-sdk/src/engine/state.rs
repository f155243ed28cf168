//! Agent state management.

use crate::engine::events::TaskInfo;
use crate::types::{EditResult, EditState, Message, ToolOutput, ToolResult};

/// Internal state of one request.
pub(crate) struct LoopState {
    pub(crate) user_message: String,
    pub(crate) history: Vec<Message>,
    pub(crate) remaining: u32,
    pub(crate) iteration: u32,
    pub(crate) final_response: String,
    pub(crate) task: Option<TaskInfo>,
    pub(crate) proposed_edits: Vec<EditResult>,
}

impl LoopState {
    pub(crate) fn new(user_message: &str, budget: u32) -> Self {
        Self {
            user_message: user_message.to_string(),
            history: vec![Message::user(user_message)],
            remaining: budget,
            iteration: 0,
            final_response: String::new(),
            task: None,
            proposed_edits: Vec::new(),
        }
    }

    /// Appends non-empty prose to the answer, separated by a blank line.
    pub(crate) fn append_response(&mut self, prose: &str) {
        let prose = prose.trim();
        if prose.is_empty() {
            return;
        }
        if !self.final_response.is_empty() {
            self.final_response.push_str("\n\n");
        }
        self.final_response.push_str(prose);
    }

    /// Keeps every edit from `results` that still awaits review.
    pub(crate) fn collect_edits(&mut self, results: &[ToolResult]) {
        self.proposed_edits
            .extend(results.iter().filter_map(|r| match &r.result {
                Some(ToolOutput::Edit(edit)) if edit.state == EditState::Proposed => {
                    Some(edit.clone())
                }
                _ => None,
            }));
    }

    pub(crate) fn add_turn(&mut self, assistant: String, feedback: String) {
        self.history.push(Message::assistant(assistant));
        self.history.push(Message::user(feedback));
    }
}

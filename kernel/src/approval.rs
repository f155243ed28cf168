//! Approval sinks used by the CLI.

use codemate_sdk::{ApprovalDecision, ApprovalSink, DiffStats, EditResult};
use std::io::{BufRead, Write};
use tracing::warn;

/// Approves every edit. Used when `auto_apply` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl ApprovalSink for AutoApprove {
    fn review(&mut self, _edit: &EditResult) -> ApprovalDecision {
        ApprovalDecision::Approve
    }
}

/// Rejects every edit.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAll;

impl ApprovalSink for RejectAll {
    fn review(&mut self, _edit: &EditResult) -> ApprovalDecision {
        ApprovalDecision::Reject
    }
}

/// Shows each diff and asks `y/n` on a terminal-like pair of streams.
///
/// Anything but `y` or `yes` rejects, including read errors and end of input.
#[derive(Debug)]
pub struct PromptApprover<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptApprover<R, W> {
    /// Creates an approver reading answers from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, edit: &EditResult) -> std::io::Result<String> {
        let stats = DiffStats::from_diff(&edit.diff);
        writeln!(self.output)?;
        writeln!(self.output, "{}", edit.diff)?;
        write!(
            self.output,
            "Apply edit to {} (+{} -{})? [y/N] ",
            edit.path, stats.added, stats.removed
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> ApprovalSink for PromptApprover<R, W> {
    fn review(&mut self, edit: &EditResult) -> ApprovalDecision {
        match self.ask(edit) {
            Ok(answer) if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
                ApprovalDecision::Approve
            }
            Ok(_) => ApprovalDecision::Reject,
            Err(e) => {
                warn!(error = %e, path = %edit.path, "Approval prompt failed; rejecting edit");
                ApprovalDecision::Reject
            }
        }
    }
}

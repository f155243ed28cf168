//! Review of proposed edits.
//!
//! The agent loop never writes an edit. It hands every `Proposed` edit back
//! to the host, which asks an [`ApprovalSink`] and passes the decision to
//! [`FileOperations::apply_edit`](crate::fs::FileOperations::apply_edit).

use crate::error::FileOpError;
use crate::fs::FileOperations;
use crate::types::{EditResult, EditState};
use tracing::warn;

/// Outcome of reviewing one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Write the edit.
    Approve,
    /// Discard the edit.
    Reject,
}

/// Decides whether a proposed edit may be written.
pub trait ApprovalSink {
    /// Reviews one edit. Called once per proposed edit, in proposal order.
    fn review(&mut self, edit: &EditResult) -> ApprovalDecision;
}

impl<F> ApprovalSink for F
where
    F: FnMut(&EditResult) -> ApprovalDecision,
{
    fn review(&mut self, edit: &EditResult) -> ApprovalDecision {
        self(edit)
    }
}

/// Asks `sink` about every edit in order and resolves each one.
///
/// An edit that fails to write is logged, left `Proposed`, and reported in
/// the returned list; the remaining edits are still reviewed.
pub fn review_edits(
    files: &FileOperations,
    edits: &mut [EditResult],
    sink: &mut dyn ApprovalSink,
) -> Vec<(String, FileOpError)> {
    let mut failures = Vec::new();
    for edit in edits.iter_mut().filter(|e| e.state == EditState::Proposed) {
        let decision = sink.review(edit);
        if let Err(e) = files.apply_edit(edit, decision) {
            warn!(path = %edit.path, error = %e, "Edit could not be applied");
            failures.push((edit.path.clone(), e));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::test_support::project;
    use crate::types::ToolOutput;

    fn proposed(files: &FileOperations, path: &str, search: &str, replace: &str) -> EditResult {
        match files.edit(path, search, replace).unwrap() {
            ToolOutput::Edit(edit) => edit,
            other => panic!("expected an edit, got {other:?}"),
        }
    }

    #[test]
    fn test_review_applies_approved_and_skips_rejected() {
        let (dir, files) = project(&[("a.txt", "one"), ("b.txt", "two")]);
        let mut edits = vec![
            proposed(&files, "a.txt", "one", "uno"),
            proposed(&files, "b.txt", "two", "dos"),
        ];

        let mut seen = Vec::new();
        let mut sink = |edit: &EditResult| {
            seen.push(edit.path.clone());
            if edit.path == "a.txt" {
                ApprovalDecision::Approve
            } else {
                ApprovalDecision::Reject
            }
        };
        let failures = review_edits(&files, &mut edits, &mut sink);

        assert!(failures.is_empty());
        assert_eq!(seen, vec!["a.txt", "b.txt"]);
        assert_eq!(edits[0].state, EditState::Applied);
        assert_eq!(edits[1].state, EditState::Rejected);
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "uno");
        assert_eq!(std::fs::read_to_string(dir.path().join("b.txt")).unwrap(), "two");
    }

    #[test]
    fn test_resolved_edits_are_not_reviewed_again() {
        let (_dir, files) = project(&[("a.txt", "one")]);
        let mut edits = vec![proposed(&files, "a.txt", "one", "uno")];
        edits[0].state = EditState::Rejected;

        let mut calls = 0;
        let mut sink = |_: &EditResult| {
            calls += 1;
            ApprovalDecision::Approve
        };
        review_edits(&files, &mut edits, &mut sink);
        assert_eq!(calls, 0);
    }
}

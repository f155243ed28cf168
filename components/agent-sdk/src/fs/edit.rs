use super::FileOperations;
use crate::approval::ApprovalDecision;
use crate::diff::unified_diff;
use crate::error::FileOpError;
use crate::types::{EditResult, EditState, ToolOutput};
use tracing::{debug, info};

impl FileOperations {
    /// Proposes replacing the first occurrence of `search` with `replace`.
    ///
    /// Nothing is written: the returned edit is `Proposed` and only
    /// [`apply_edit`](Self::apply_edit) can commit it.
    ///
    /// # Errors
    ///
    /// Fails when the path is rejected, the file is missing, or `search` does
    /// not occur in it.
    pub fn edit(&self, path: &str, search: &str, replace: &str) -> Result<ToolOutput, FileOpError> {
        let file = self.secure(path)?;
        let original = file.read()?;

        if !original.contains(search) {
            return Err(FileOpError::SearchContentAbsent {
                path: file.relative().to_string(),
            });
        }

        let updated = original.replacen(search, replace, 1);
        let diff = unified_diff(file.relative(), &original, &updated);
        debug!(path = file.relative(), "Edit proposed");

        Ok(ToolOutput::Edit(EditResult {
            path: file.relative().to_string(),
            original_content: original,
            new_content: updated,
            diff,
            state: EditState::Proposed,
        }))
    }

    /// Resolves a proposed edit.
    ///
    /// `Approve` re-validates the path and writes `new_content` wholesale;
    /// `Reject` discards it. Returns the edit's new state.
    ///
    /// # Errors
    ///
    /// Fails with `EditAlreadyResolved` when the edit is not `Proposed`, and
    /// with a path or I/O error when the approved write fails. A failed write
    /// leaves the edit `Proposed`.
    pub fn apply_edit(
        &self,
        edit: &mut EditResult,
        decision: ApprovalDecision,
    ) -> Result<EditState, FileOpError> {
        if edit.state != EditState::Proposed {
            return Err(FileOpError::EditAlreadyResolved {
                path: edit.path.clone(),
                state: edit.state.to_string(),
            });
        }

        match decision {
            ApprovalDecision::Approve => {
                let file = self.secure(&edit.path)?;
                file.write(&edit.new_content)?;
                edit.state = EditState::Applied;
            }
            ApprovalDecision::Reject => edit.state = EditState::Rejected,
        }

        info!(path = %edit.path, state = %edit.state, "Edit resolved");
        Ok(edit.state)
    }
}

use super::FileOperations;
use crate::error::FileOpError;
use crate::types::ToolOutput;
use tracing::debug;

impl FileOperations {
    /// Creates or overwrites a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Fails when the path is rejected or the write fails.
    pub fn write(&self, path: &str, content: &str) -> Result<ToolOutput, FileOpError> {
        let file = self.secure(path)?;
        file.write(content)?;
        debug!(path = file.relative(), bytes = content.len(), "File written");

        Ok(ToolOutput::Message {
            message: format!("File written: {}", file.relative()),
        })
    }
}

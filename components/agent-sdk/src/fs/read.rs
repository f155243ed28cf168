use super::FileOperations;
use crate::error::FileOpError;
use crate::types::ToolOutput;
use std::fmt::Write;

impl FileOperations {
    /// Reads a file, optionally restricted to a 1-based inclusive line range.
    ///
    /// Each returned line is prefixed with its number, right-aligned to width
    /// four, followed by `│ `. The range is clamped to the file.
    ///
    /// # Errors
    ///
    /// Fails when the path is rejected, the file is missing, or it exceeds
    /// the configured read limit.
    pub fn read(
        &self,
        path: &str,
        start_line: Option<usize>,
        end_line: Option<usize>,
    ) -> Result<ToolOutput, FileOpError> {
        let file = self.secure(path)?;
        let content = file.read_with_limit(self.config.max_file_read_size)?;

        let lines: Vec<&str> = content.split('\n').collect();
        let start = start_line.unwrap_or(1).max(1) - 1;
        let end = end_line.unwrap_or(lines.len()).min(lines.len());
        let selected = lines.get(start..end).unwrap_or_default();

        let mut numbered = String::new();
        for (idx, line) in selected.iter().enumerate() {
            if idx > 0 {
                numbered.push('\n');
            }
            let _ = write!(numbered, "{:>4}│ {line}", start + idx + 1);
        }

        Ok(ToolOutput::FileContent {
            path: file.relative().to_string(),
            content: numbered,
            line_count: selected.len(),
            truncated: end < lines.len() || start > 0,
        })
    }
}

use super::{FileOperations, compile_glob, non_empty, slash_relative};
use crate::error::FileOpError;
use crate::types::{SearchMatch, ToolOutput};
use tracing::debug;
use walkdir::WalkDir;

impl FileOperations {
    /// Case-insensitive substring search over files under `path` (default
    /// the root) matching `file_pattern` (default `**/*`).
    ///
    /// At most `search_file_limit` files are considered and at most
    /// `search_match_limit` matches are returned, in walk order. Unreadable,
    /// oversized and non-UTF-8 files are skipped.
    ///
    /// # Errors
    ///
    /// Fails when the search path is rejected or missing, or the pattern is
    /// not a valid glob.
    pub fn search(
        &self,
        query: &str,
        path: Option<&str>,
        file_pattern: Option<&str>,
    ) -> Result<ToolOutput, FileOpError> {
        let base_raw = non_empty(path).unwrap_or(".");
        let base = self.secure(base_raw)?;
        if !base.path().exists() {
            return Err(FileOpError::NotFound {
                path: base_raw.to_string(),
            });
        }
        let matcher = compile_glob(non_empty(file_pattern).unwrap_or("**/*"))?;
        let root = self.root().ok_or(FileOpError::NoWorkspace)?;
        let needle = query.to_lowercase();
        let single_file = base.path().is_file();

        let candidates = WalkDir::new(base.path())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_hidden(root, e))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| single_file || matcher.is_match(slash_relative(base.path(), e.path())))
            .take(self.config.search_file_limit);

        let limit = self.config.search_match_limit;
        let mut matches = Vec::new();
        'files: for entry in candidates {
            let too_large = entry
                .metadata()
                .map_or(true, |m| m.len() > self.config.max_file_read_size);
            if too_large {
                debug!(path = %entry.path().display(), "Skipping oversized file");
                continue;
            }
            let Ok(content) = std::fs::read_to_string(entry.path()) else {
                debug!(path = %entry.path().display(), "Skipping unreadable file");
                continue;
            };

            let relative = slash_relative(root, entry.path());
            for (idx, line) in content.split('\n').enumerate() {
                if matches.len() >= limit {
                    break 'files;
                }
                if line.to_lowercase().contains(&needle) {
                    matches.push(SearchMatch {
                        path: relative.clone(),
                        line: idx + 1,
                        content: line
                            .trim()
                            .chars()
                            .take(self.config.search_line_max_chars)
                            .collect(),
                    });
                }
            }
        }

        Ok(ToolOutput::Search {
            query: query.to_string(),
            total_matches: matches.len(),
            matches,
        })
    }
}

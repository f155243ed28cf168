use super::{FileOperations, compile_glob, non_empty, slash_relative};
use crate::error::FileOpError;
use crate::types::{FileInfo, ToolOutput};
use tracing::{debug, warn};
use walkdir::WalkDir;

impl FileOperations {
    /// Lists entries under `directory` (default `.`) whose path relative to
    /// that directory matches `pattern` (default `*`).
    ///
    /// `node_modules` and blocked paths are skipped. At most `list_limit`
    /// entries are returned, sorted by path.
    ///
    /// # Errors
    ///
    /// Fails when the directory is rejected or missing, or the pattern is not
    /// a valid glob.
    pub fn list(
        &self,
        directory: Option<&str>,
        pattern: Option<&str>,
    ) -> Result<ToolOutput, FileOpError> {
        let directory = non_empty(directory).unwrap_or(".");
        let pattern = non_empty(pattern).unwrap_or("*");

        let dir = self.secure_dir(directory)?;
        let matcher = compile_glob(pattern)?;
        let root = self.root().ok_or(FileOpError::NoWorkspace)?;

        let mut walker = WalkDir::new(dir.path()).min_depth(1).sort_by_file_name();
        if !pattern.contains('/') {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker.into_iter().filter_entry(|e| !self.is_hidden(root, e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !matcher.is_match(slash_relative(dir.path(), entry.path())) {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            files.push(FileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: slash_relative(root, entry.path()),
                is_directory: metadata.is_dir(),
                size: metadata.len(),
            });

            if files.len() >= self.config.list_limit {
                debug!(limit = self.config.list_limit, "Listing truncated");
                break;
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(ToolOutput::FileList {
            directory: directory.to_string(),
            total_count: files.len(),
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AgentConfig;
    use crate::error::FileOpError;
    use crate::fs::test_support::{project, project_with};
    use crate::types::{FileInfo, ToolOutput};

    fn unwrap_files(output: ToolOutput) -> Vec<FileInfo> {
        match output {
            ToolOutput::FileList {
                files, total_count, ..
            } => {
                assert_eq!(files.len(), total_count);
                files
            }
            other => panic!("expected a listing, got {other:?}"),
        }
    }

    fn paths(files: &[FileInfo]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_list_json_at_root() {
        let (_dir, ops) = project(&[
            ("tsconfig.json", "{}"),
            ("package.json", "{}"),
            ("README.md", "# hi"),
            ("src/inner.json", "{}"),
        ]);
        let files = unwrap_files(ops.list(Some("."), Some("*.json")).unwrap());
        assert_eq!(paths(&files), vec!["package.json", "tsconfig.json"]);
        assert_eq!(files[0].name, "package.json");
        assert_eq!(files[0].size, 2);
        assert!(!files[0].is_directory);
    }

    #[test]
    fn test_list_defaults_include_directories() {
        let (_dir, ops) = project(&[("a.txt", ""), ("src/lib.rs", "")]);
        let files = unwrap_files(ops.list(None, None).unwrap());
        assert_eq!(paths(&files), vec!["a.txt", "src"]);
        assert!(files[1].is_directory);
    }

    #[test]
    fn test_list_subdirectory_recursive() {
        let (_dir, ops) = project(&[
            ("src/main.rs", ""),
            ("src/util/mod.rs", ""),
            ("src/util/notes.md", ""),
        ]);
        let files = unwrap_files(ops.list(Some("src"), Some("**/*.rs")).unwrap());
        assert_eq!(paths(&files), vec!["src/main.rs", "src/util/mod.rs"]);
    }

    #[test]
    fn test_list_skips_node_modules_and_blocked() {
        let (_dir, ops) = project(&[
            ("index.js", ""),
            ("node_modules/dep/index.js", ""),
            (".env", "X=1"),
        ]);
        let files = unwrap_files(ops.list(None, Some("**/*")).unwrap());
        assert_eq!(paths(&files), vec!["index.js"]);
    }

    #[test]
    fn test_list_respects_limit() {
        let config = AgentConfig::builder().list_limit(2).build().unwrap();
        let (_dir, ops) = project_with(&[("a", ""), ("b", ""), ("c", "")], &config);
        let files = unwrap_files(ops.list(None, None).unwrap());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_list_missing_directory() {
        let (_dir, ops) = project(&[]);
        let err = ops.list(Some("nowhere"), None).unwrap_err();
        assert!(matches!(err, FileOpError::NotFound { .. }));
    }
}

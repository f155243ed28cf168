//! File operations engine.
//!
//! Every operation validates its path arguments into the project root before
//! touching the disk, and reports failures as [`FileOpError`] values that the
//! executor turns into failed tool results.

mod edit;
mod list;
mod read;
mod search;
mod write;

use crate::config::AgentConfig;
use crate::error::{ConfigError, FileOpError};
use crate::tools::validation::{PathValidator, SecureFilePath, Validated};
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::DirEntry;

/// Directory name skipped by listing and search regardless of the blocklist.
const NODE_MODULES: &str = "node_modules";

/// Sandboxed file operations under a single project root.
#[derive(Debug, Clone)]
pub struct FileOperations {
    validator: PathValidator,
    config: AgentConfig,
}

impl FileOperations {
    /// Creates the engine for `root` using the limits and blocklist in
    /// `config`. A `None` root makes every operation fail with `NoWorkspace`.
    ///
    /// # Errors
    ///
    /// Returns an error if a blocklist pattern is invalid.
    pub fn new(root: Option<PathBuf>, config: &AgentConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            validator: PathValidator::new(root, &config.blocked_patterns)?,
            config: config.clone(),
        })
    }

    /// The path validator in use.
    #[must_use]
    pub fn validator(&self) -> &PathValidator {
        &self.validator
    }

    /// The project root, if one is open.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.validator.root()
    }

    fn secure(&self, raw: &str) -> Result<SecureFilePath<Validated>, FileOpError> {
        SecureFilePath::new(raw).validate(&self.validator)
    }

    /// Validates `raw` as an existing directory.
    fn secure_dir(&self, raw: &str) -> Result<SecureFilePath<Validated>, FileOpError> {
        let dir = self.secure(raw)?;
        if dir.path().is_dir() {
            Ok(dir)
        } else {
            Err(FileOpError::NotFound {
                path: raw.to_string(),
            })
        }
    }

    /// Whether a walked entry should be pruned.
    fn is_hidden(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.file_type().is_dir() && entry.file_name() == NODE_MODULES {
            return true;
        }
        let relative = slash_relative(root, entry.path());
        self.validator.is_blocked(&relative)
    }
}

/// Compiles a user glob where `*` stays within one path segment.
fn compile_glob(pattern: &str) -> Result<GlobMatcher, FileOpError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| FileOpError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

/// `path` relative to `base`, with `/` separators.
fn slash_relative(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Treats an absent or blank optional argument as missing.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

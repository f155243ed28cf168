//! Security validation for tool operations.
//!
//! Every path the model supplies goes through [`PathValidator`] before any
//! I/O. Validation is purely lexical: the file system is never consulted,
//! so a path that does not exist yet (a `write_file` target) validates the
//! same way as one that does.

use crate::error::{ConfigError, FileOpError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};

const OUTSIDE_ROOT: &str = "Cannot access files outside the project folder.";

/// Outcome of validating one raw path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathValidation {
    /// Whether the path may be used.
    pub valid: bool,
    /// Root-relative path with `/` separators when valid, otherwise the
    /// slash-converted input.
    pub normalized_path: String,
    /// Absolute, lexically normalized path.
    pub full_path: PathBuf,
    /// Rejection reason when invalid.
    pub error: Option<String>,
}

impl PathValidation {
    fn rejected(normalized_path: String, full_path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            normalized_path,
            full_path,
            error: Some(error.into()),
        }
    }
}

/// Confines paths to a project root and applies the blocklist.
#[derive(Debug, Clone)]
pub struct PathValidator {
    root: Option<PathBuf>,
    patterns: Vec<String>,
    blocklist: GlobSet,
}

impl PathValidator {
    /// Creates a validator for `root` with the given blocklist.
    ///
    /// Patterns are matched case-insensitively; `*` does not cross `/`
    /// while `**` does.
    /// A relative root is resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob or the root cannot be
    /// made absolute.
    pub fn new(root: Option<PathBuf>, blocked_patterns: &[String]) -> Result<Self, ConfigError> {
        let root = root.map(|r| absolute_root(&r)).transpose()?;

        let mut builder = GlobSetBuilder::new();
        for pattern in blocked_patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidBlockedPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            builder.add(glob);
        }
        let blocklist = builder
            .build()
            .map_err(|e| ConfigError::InvalidBlockedPattern {
                pattern: blocked_patterns.join(", "),
                reason: e.to_string(),
            })?;

        Ok(Self {
            root,
            patterns: blocked_patterns.to_vec(),
            blocklist,
        })
    }

    /// The project root, if one is open.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Validates a raw path supplied by the model.
    #[must_use]
    pub fn validate(&self, raw: &str) -> PathValidation {
        let slashed = raw.replace('\\', "/");

        let Some(root) = &self.root else {
            return PathValidation::rejected(
                slashed.clone(),
                PathBuf::from(slashed),
                FileOpError::NoWorkspace.to_string(),
            );
        };

        let candidate = Path::new(&slashed);
        let full_path = if candidate.is_absolute() {
            normalize(candidate)
        } else {
            normalize(&root.join(candidate))
        };

        let Some(relative) = relative_to(&full_path, root) else {
            return PathValidation::rejected(slashed, full_path, OUTSIDE_ROOT);
        };

        if let Some(pattern) = self.blocked_by(&relative) {
            return PathValidation::rejected(
                slashed,
                full_path,
                format!("Access to this file is blocked for security reasons: {pattern}"),
            );
        }

        PathValidation {
            valid: true,
            normalized_path: relative,
            full_path,
            error: None,
        }
    }

    /// Returns the first blocklist pattern matching `relative` or its file
    /// name.
    fn blocked_by(&self, relative: &str) -> Option<&str> {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.blocklist
            .matches(relative)
            .into_iter()
            .chain(self.blocklist.matches(file_name))
            .min()
            .map(|idx| self.patterns[idx].as_str())
    }

    /// Whether `relative` is hidden by the blocklist.
    #[must_use]
    pub fn is_blocked(&self, relative: &str) -> bool {
        self.blocked_by(relative).is_some()
    }
}

fn absolute_root(root: &Path) -> Result<PathBuf, ConfigError> {
    let absolute = std::path::absolute(root).map_err(|e| ConfigError::InvalidValue {
        key: "root".to_string(),
        value: format!("{}: {e}", root.display()),
    })?;
    Ok(normalize(&absolute))
}

/// Lexically resolves `.` and `..` without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Expresses `path` relative to `root` with `/` separators, or `None` when
/// it lies outside.
fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let rest = path.strip_prefix(root).ok()?;
    let parts = rest
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()?;
    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

/// Type-State pattern for secure file operations.
///
/// File operations only accept `SecureFilePath<Validated>`, so I/O on a path
/// that skipped the validator does not type-check.
#[derive(Debug)]
pub struct SecureFilePath<State> {
    raw: String,
    relative: String,
    path: PathBuf,
    _state: PhantomData<State>,
}

/// Unvalidated state.
#[derive(Debug)]
pub struct Unvalidated;

/// Validated state.
#[derive(Debug)]
pub struct Validated;

impl SecureFilePath<Unvalidated> {
    /// Wraps a raw path as supplied by the model.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            path: PathBuf::from(&raw),
            relative: raw.clone(),
            raw,
            _state: PhantomData,
        }
    }

    /// Runs the validator.
    ///
    /// # Errors
    ///
    /// Returns `NoWorkspace` when no root is open and `PathRejected` when the
    /// path escapes the root or is blocked.
    pub fn validate(
        self,
        validator: &PathValidator,
    ) -> Result<SecureFilePath<Validated>, FileOpError> {
        if validator.root().is_none() {
            return Err(FileOpError::NoWorkspace);
        }

        let validation = validator.validate(&self.raw);
        if !validation.valid {
            return Err(FileOpError::PathRejected {
                path: self.raw,
                reason: validation.error.unwrap_or_else(|| OUTSIDE_ROOT.to_string()),
            });
        }

        Ok(SecureFilePath {
            raw: self.raw,
            relative: validation.normalized_path,
            path: validation.full_path,
            _state: PhantomData,
        })
    }
}

impl SecureFilePath<Validated> {
    /// Returns the absolute validated path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the root-relative path with `/` separators.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Returns the path as the model wrote it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Reads the file content with size validation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing file, `TooLarge` when the size
    /// exceeds `max_size`, and `Io` for any other failure including
    /// non-UTF-8 content.
    pub fn read_with_limit(&self, max_size: u64) -> Result<String, FileOpError> {
        let metadata = std::fs::metadata(&self.path).map_err(|e| self.not_found_or_io(e))?;
        if metadata.is_dir() {
            return Err(FileOpError::NotFound {
                path: self.raw.clone(),
            });
        }

        let size = metadata.len();
        if size > max_size {
            return Err(FileOpError::TooLarge {
                path: self.path.clone(),
                size,
                max_size,
            });
        }

        self.read()
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing file and `Io` otherwise.
    pub fn read(&self) -> Result<String, FileOpError> {
        std::fs::read_to_string(&self.path).map_err(|e| self.not_found_or_io(e))
    }

    /// Writes content to the file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if parent directories cannot be created or if the file
    /// cannot be written.
    pub fn write(&self, content: &str) -> Result<(), FileOpError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FileOpError::io(parent, e))?;
        }
        std::fs::write(&self.path, content).map_err(|e| FileOpError::io(&self.path, e))
    }

    fn not_found_or_io(&self, err: std::io::Error) -> FileOpError {
        if err.kind() == ErrorKind::NotFound {
            FileOpError::NotFound {
                path: self.raw.clone(),
            }
        } else {
            FileOpError::io(&self.path, err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_blocked_patterns;

    fn validator(root: &Path) -> PathValidator {
        PathValidator::new(Some(root.to_path_buf()), &default_blocked_patterns()).unwrap()
    }

    #[test]
    fn test_relative_path_is_resolved_under_root() {
        let v = validator(Path::new("/work/project"));
        let result = v.validate("src/./lib.rs");
        assert!(result.valid);
        assert_eq!(result.normalized_path, "src/lib.rs");
        assert_eq!(result.full_path, PathBuf::from("/work/project/src/lib.rs"));
    }

    #[test]
    fn test_validate_path_traversal() {
        let v = validator(Path::new("/work/project"));
        let result = v.validate("../../etc/passwd");
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some(OUTSIDE_ROOT));
    }

    #[test]
    fn test_inner_parent_dir_stays_inside() {
        let v = validator(Path::new("/work/project"));
        let result = v.validate("src/../README.md");
        assert!(result.valid);
        assert_eq!(result.normalized_path, "README.md");
    }

    #[test]
    fn test_absolute_paths() {
        let v = validator(Path::new("/work/project"));
        assert!(v.validate("/work/project/a.txt").valid);
        assert!(!v.validate("/work/projectile/a.txt").valid);
        assert!(!v.validate("/etc/passwd").valid);
    }

    #[test]
    fn test_backslashes_are_converted() {
        let v = validator(Path::new("/work/project"));
        let result = v.validate("src\\main.rs");
        assert!(result.valid);
        assert_eq!(result.normalized_path, "src/main.rs");
    }

    #[test]
    fn test_blocklist_matches_path_and_basename() {
        let v = validator(Path::new("/work/project"));

        let env = v.validate(".env");
        assert!(!env.valid);
        assert!(env.error.unwrap().ends_with(": .env"));

        assert!(!v.validate("config/.env.local").valid);
        assert!(!v.validate("certs/server.PEM").valid);
        assert!(!v.validate("credentials.json").valid);
        assert!(!v.validate("web/node_modules/react/index.js").valid);
        assert!(!v.validate("sub/.git/config").valid);
        assert!(v.validate("src/environment.rs").valid);
    }

    #[test]
    fn test_relative_root_is_made_absolute() {
        let v = PathValidator::new(Some(PathBuf::from(".")), &default_blocked_patterns()).unwrap();
        let root = v.root().unwrap();
        assert!(root.is_absolute());

        assert!(!v.validate("../outside.txt").valid);
        assert!(!v.validate("/etc/passwd").valid);

        let inside = v.validate("src/lib.rs");
        assert!(inside.valid);
        assert_eq!(inside.normalized_path, "src/lib.rs");
        assert_eq!(inside.full_path, root.join("src/lib.rs"));
    }

    #[test]
    fn test_relative_to_rejects_non_normal_components() {
        assert_eq!(relative_to(Path::new("/w/a/b"), Path::new("/w")).as_deref(), Some("a/b"));
        assert_eq!(relative_to(Path::new("/w"), Path::new("/w")).as_deref(), Some("."));
        assert!(relative_to(Path::new("../x"), Path::new("")).is_none());
        assert!(relative_to(Path::new("/etc/passwd"), Path::new("")).is_none());
    }

    #[test]
    fn test_no_workspace() {
        let v = PathValidator::new(None, &[]).unwrap();
        let result = v.validate("a.txt");
        assert!(!result.valid);

        let err = SecureFilePath::new("a.txt").validate(&v).unwrap_err();
        assert!(matches!(err, FileOpError::NoWorkspace));
    }

    #[test]
    fn test_invalid_blocked_pattern() {
        let err = PathValidator::new(None, &["a[".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBlockedPattern { .. }));
    }

    #[test]
    fn test_secure_file_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let v = validator(temp_dir.path());

        let secure = SecureFilePath::new("nested/test.txt").validate(&v).unwrap();
        secure.write("Hello").unwrap();
        assert_eq!(secure.read_with_limit(1024).unwrap(), "Hello");
        assert_eq!(secure.relative(), "nested/test.txt");

        let err = secure.read_with_limit(2).unwrap_err();
        assert!(matches!(err, FileOpError::TooLarge { size: 5, .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let v = validator(temp_dir.path());
        let secure = SecureFilePath::new("ghost.txt").validate(&v).unwrap();
        let err = secure.read_with_limit(1024).unwrap_err();
        assert_eq!(err.to_string(), "File not found: ghost.txt");
    }
}

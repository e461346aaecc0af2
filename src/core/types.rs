//! Core data types for aggrefiles

use crate::core::error::{AggregateError, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;
use std::time::Duration;

/// File extension used to select files, always stored with a leading dot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Extension(String);

impl Extension {
    /// Parse and normalize an extension (`txt` and `.txt` are equivalent)
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AggregateError::invalid_extension(raw, "extension is empty"));
        }
        if trimmed.contains('/') || trimmed.contains('\\') {
            return Err(AggregateError::invalid_extension(
                raw,
                "extension must not contain path separators",
            ));
        }

        let normalized = if trimmed.starts_with('.') {
            trimmed.to_string()
        } else {
            format!(".{}", trimmed)
        };

        if normalized == "." {
            return Err(AggregateError::invalid_extension(
                raw,
                "extension has no characters after the dot",
            ));
        }

        Ok(Self(normalized))
    }

    /// The normalized extension, including the leading dot
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether a file name ends with this extension.
    ///
    /// Matching is case-sensitive. A name that is exactly the extension
    /// (a dotfile such as `.txt`) has no extension and does not match.
    pub fn matches_name(&self, file_name: &str) -> bool {
        file_name.len() > self.0.len() && file_name.ends_with(&self.0)
    }

    /// Check whether the final component of `path` ends with this extension
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.matches_name(name))
            .unwrap_or(false)
    }
}

impl FromStr for Extension {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file skipped because it could not be read as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// Path relative to the root, forward slashes
    pub path: String,
    /// Human readable cause
    pub reason: String,
}

/// Outcome of one aggregation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Files that passed the matcher, extension filter and self-reference check
    pub files_matched: usize,
    /// Records written to the output
    pub files_written: usize,
    /// Matched files skipped because they could not be read as text
    pub files_skipped: usize,
    /// Files excluded by ignore rules
    pub files_ignored: usize,
    /// Directories excluded by ignore rules and never entered
    pub dirs_pruned: usize,
    /// Entries the walker could not access
    pub walk_errors: usize,
    /// Bytes written to the output stream
    pub bytes_written: u64,
    /// Per-file diagnostics, in traversal order
    pub failures: Vec<FileFailure>,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl Summary {
    /// Whether any matched file had to be skipped
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn to_slash_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extension_normalization() -> Result<()> {
        assert_eq!(Extension::parse("txt")?.as_str(), ".txt");
        assert_eq!(Extension::parse(".txt")?.as_str(), ".txt");
        assert_eq!(Extension::parse(" md ")?.as_str(), ".md");
        assert_eq!(Extension::parse("tar.gz")?.as_str(), ".tar.gz");
        Ok(())
    }

    #[test]
    fn test_extension_rejects_invalid() {
        assert!(Extension::parse("").is_err());
        assert!(Extension::parse("   ").is_err());
        assert!(Extension::parse(".").is_err());
        assert!(Extension::parse("a/b").is_err());

        let err = Extension::parse("").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_extension_matching() -> Result<()> {
        let ext = Extension::parse("txt")?;
        assert!(ext.matches(Path::new("notes.txt")));
        assert!(ext.matches(Path::new("deep/dir/notes.txt")));
        assert!(!ext.matches(Path::new("notes.TXT")));
        assert!(!ext.matches(Path::new("notes.txt.bak")));
        assert!(!ext.matches(Path::new("notestxt")));
        assert!(!ext.matches(Path::new(".txt")));
        Ok(())
    }

    #[test]
    fn test_to_slash_path() {
        let path: PathBuf = ["src", "nested", "file.txt"].iter().collect();
        assert_eq!(to_slash_path(&path), "src/nested/file.txt");
        assert_eq!(to_slash_path(Path::new("file.txt")), "file.txt");
        assert_eq!(to_slash_path(Path::new("")), "");
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = Summary {
            files_matched: 2,
            files_written: 1,
            files_skipped: 1,
            failures: vec![FileFailure {
                path: "bad.txt".to_string(),
                reason: "binary content".to_string(),
            }],
            ..Summary::default()
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["files_matched"], 2);
        assert_eq!(json["files_written"], 1);
        assert_eq!(json["failures"][0]["path"], "bad.txt");
        assert_eq!(json["failures"][0]["reason"], "binary content");
        assert!(summary.has_failures());
    }
}

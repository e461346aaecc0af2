//! Error types for aggrefiles

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aggregation runs
#[derive(Error, Debug)]
pub enum AggregateError {
    /// Configuration errors
    #[error("Invalid root directory: {path} ({reason})")]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("Invalid extension '{extension}': {reason}")]
    InvalidExtension { extension: String, reason: String },

    #[error("Cannot read pattern file {path}: {source}")]
    PatternFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {reason}")]
    ConfigurationError { reason: String },

    /// Per-file errors, recovered by the aggregator
    #[error("Failed to read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    /// Output errors
    #[error("Failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AggregateError {
    /// Create a new invalid root error
    pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid extension error
    pub fn invalid_extension(extension: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExtension {
            extension: extension.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Create a new file read error
    pub fn file_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new output write error
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether this error was caused by bad input or configuration.
    ///
    /// These are always raised before the output file is opened.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoot { .. }
                | Self::InvalidExtension { .. }
                | Self::PatternFileUnreadable { .. }
                | Self::ConfigurationError { .. }
        )
    }

    /// Whether this error aborts the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FileRead { .. })
    }
}

/// Result type alias for aggregation operations
pub type Result<T> = std::result::Result<T, AggregateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let root = AggregateError::invalid_root("/nope", "does not exist");
        assert!(root.is_configuration());
        assert!(root.is_fatal());

        let read = AggregateError::file_read("a.txt", "invalid UTF-8");
        assert!(!read.is_configuration());
        assert!(!read.is_fatal());

        let write = AggregateError::output_write(
            "out.txt",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert!(!write.is_configuration());
        assert!(write.is_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = AggregateError::invalid_extension("", "extension is empty");
        assert_eq!(err.to_string(), "Invalid extension '': extension is empty");

        let err = AggregateError::file_read("src/bin.txt", "stream did not contain valid UTF-8");
        assert!(err.to_string().contains("src/bin.txt"));
    }
}

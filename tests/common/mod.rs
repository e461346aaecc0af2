//! Test utilities for aggrefiles tests
#![allow(dead_code)]

use aggrefiles::aggregate::SEPARATOR;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory tree with automatic cleanup
pub struct TestTree {
    pub temp_dir: TempDir,
}

impl TestTree {
    /// Create an empty tree
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Root of the tree
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a relative entry
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Write a file, creating parent directories
    pub fn file(&self, relative: &str, content: impl AsRef<[u8]>) -> anyhow::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a directory (and parents)
    pub fn dir(&self, relative: &str) -> anyhow::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}

/// Relative paths of the records in an aggregate, in order
pub fn record_paths(output: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut expect_path = true;

    for line in output.lines() {
        if expect_path {
            paths.push(line.to_string());
            expect_path = false;
        } else if line == SEPARATOR {
            expect_path = true;
        }
    }

    paths
}

/// Number of separator lines in an aggregate
pub fn separator_count(output: &str) -> usize {
    output.lines().filter(|line| *line == SEPARATOR).count()
}

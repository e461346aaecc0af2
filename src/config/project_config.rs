//! Project configuration stored in `.aggrefiles.toml`
//!
//! Every key is optional. Values here are defaults for a given tree and are
//! overridden by command-line flags and environment variables.

use crate::core::error::{AggregateError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the root directory
pub const CONFIG_FILE_NAME: &str = ".aggrefiles.toml";

/// Contents of a project configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Extension to aggregate
    pub ext: Option<String>,
    /// Output path; `-` means stdout
    pub output: Option<PathBuf>,
    /// Gitignore-style pattern file
    pub gitignore: Option<PathBuf>,
    /// Follow symbolic links while walking
    pub follow_links: Option<bool>,
    /// Replace invalid UTF-8 instead of skipping files
    pub lossy: Option<bool>,
}

impl ProjectConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::parse(content, "config")
    }

    /// Load configuration from disk.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AggregateError::configuration(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut config = Self::parse(&content, &path.display().to_string())?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }

        tracing::debug!(path = %path.display(), "loaded project config");
        Ok(config)
    }

    /// Find the configuration to use for a run.
    ///
    /// An explicit path must exist. Otherwise `<root>/.aggrefiles.toml` is
    /// used when present, unless discovery is disabled.
    pub fn locate(root: &Path, explicit: Option<&Path>, discover: bool) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }

        if !discover {
            return Ok(None);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate).map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AggregateError::configuration(format!("Failed to parse {}: {}", origin, e))
        })
    }

    fn resolve_paths(&mut self, base_dir: &Path) {
        if let Some(output) = &self.output {
            if output.as_os_str() != "-" && output.is_relative() {
                self.output = Some(base_dir.join(output));
            }
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.is_relative() {
                self.gitignore = Some(base_dir.join(gitignore));
            }
        }
    }
}

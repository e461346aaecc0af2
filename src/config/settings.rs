//! Effective settings for one run
//!
//! Precedence, highest first: command line (and environment), project
//! configuration, built-in defaults.

use crate::config::project_config::ProjectConfig;
use crate::core::error::Result;
use crate::core::types::Extension;
use crate::ignore::IgnoreMatcher;
use std::path::{Path, PathBuf};

/// Extension aggregated when none is configured
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Output file name, relative to the current directory
pub const DEFAULT_OUTPUT: &str = "aggregated_output.txt";

/// Where the aggregate is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A file, created or truncated
    File(PathBuf),
    /// Standard output
    Stdout,
}

impl OutputTarget {
    fn from_path(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(path)
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ext: Option<String>,
    pub output: Option<PathBuf>,
    pub gitignore: Option<PathBuf>,
    /// Flags can only switch a behavior on
    pub follow_links: bool,
    pub lossy: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory to walk
    pub root: PathBuf,
    /// Normalized extension
    pub extension: Extension,
    /// Output destination
    pub output: OutputTarget,
    /// Pattern file, if any
    pub gitignore: Option<PathBuf>,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Replace invalid UTF-8 instead of skipping files
    pub lossy: bool,
}

impl Settings {
    /// Merge command-line values, project config and defaults
    pub fn resolve(root: &Path, overrides: Overrides, config: Option<ProjectConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let raw_ext = overrides
            .ext
            .or(config.ext)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let extension = Extension::parse(&raw_ext)?;

        let output = overrides
            .output
            .or(config.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Ok(Self {
            root: root.to_path_buf(),
            extension,
            output: OutputTarget::from_path(output),
            gitignore: overrides.gitignore.or(config.gitignore),
            follow_links: overrides.follow_links || config.follow_links.unwrap_or(false),
            lossy: overrides.lossy || config.lossy.unwrap_or(false),
        })
    }

    /// Build the matcher for these settings.
    ///
    /// Without a pattern file nothing is excluded.
    pub fn build_matcher(&self) -> Result<IgnoreMatcher> {
        match &self.gitignore {
            Some(path) => IgnoreMatcher::from_file(path),
            None => Ok(IgnoreMatcher::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AggregateError;

    #[test]
    fn test_defaults() -> Result<()> {
        let settings = Settings::resolve(Path::new("."), Overrides::default(), None)?;

        assert_eq!(settings.extension.as_str(), ".txt");
        assert_eq!(
            settings.output,
            OutputTarget::File(PathBuf::from("aggregated_output.txt"))
        );
        assert!(settings.gitignore.is_none());
        assert!(!settings.follow_links);
        assert!(!settings.lossy);
        Ok(())
    }

    #[test]
    fn test_cli_overrides_config() -> Result<()> {
        let config = ProjectConfig {
            ext: Some("md".to_string()),
            output: Some(PathBuf::from("from_config.md")),
            gitignore: Some(PathBuf::from("config_rules")),
            follow_links: Some(true),
            lossy: None,
        };
        let overrides = Overrides {
            ext: Some("rs".to_string()),
            output: None,
            gitignore: Some(PathBuf::from("cli_rules")),
            follow_links: false,
            lossy: true,
        };

        let settings = Settings::resolve(Path::new("src"), overrides, Some(config))?;

        assert_eq!(settings.extension.as_str(), ".rs");
        assert_eq!(settings.output, OutputTarget::File(PathBuf::from("from_config.md")));
        assert_eq!(settings.gitignore, Some(PathBuf::from("cli_rules")));
        assert!(settings.follow_links);
        assert!(settings.lossy);
        Ok(())
    }

    #[test]
    fn test_stdout_target() -> Result<()> {
        let overrides = Overrides {
            output: Some(PathBuf::from("-")),
            ..Overrides::default()
        };
        let settings = Settings::resolve(Path::new("."), overrides, None)?;
        assert_eq!(settings.output, OutputTarget::Stdout);
        Ok(())
    }

    #[test]
    fn test_invalid_extension_is_rejected() {
        let overrides = Overrides {
            ext: Some(".".to_string()),
            ..Overrides::default()
        };
        let err = Settings::resolve(Path::new("."), overrides, None).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidExtension { .. }));
    }

    #[test]
    fn test_missing_pattern_file() -> Result<()> {
        let overrides = Overrides {
            gitignore: Some(PathBuf::from("/definitely/not/here/.gitignore")),
            ..Overrides::default()
        };
        let settings = Settings::resolve(Path::new("."), overrides, None)?;
        let err = settings.build_matcher().unwrap_err();
        assert!(err.is_configuration());
        Ok(())
    }
}

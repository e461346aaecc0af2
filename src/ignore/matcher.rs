//! Ordered rule evaluation over paths relative to the scanned root

use crate::core::error::{AggregateError, Result};
use crate::core::types::to_slash_path;
use crate::ignore::parser::{parse_line, IgnoreRule, PatternType};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of evaluating the rules against a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No rule matched
    Unmatched,
    /// The last matching rule excludes the path
    Excluded(String), // Rule that excluded it
    /// The last matching rule is a negation
    Reincluded(String), // Rule that re-included it
}

impl MatchOutcome {
    /// Whether the path is excluded
    pub fn is_excluded(&self) -> bool {
        matches!(self, MatchOutcome::Excluded(_))
    }
}

/// Compiled set of gitignore-style rules.
///
/// Built once before traversal and never modified afterwards. An empty
/// matcher excludes nothing.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    /// Rules in file order; later rules win
    rules: Vec<IgnoreRule>,
    /// Pattern file the rules came from, if any
    source: Option<PathBuf>,
}

impl IgnoreMatcher {
    /// Matcher that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load rules from a pattern file.
    ///
    /// Fails with [`AggregateError::PatternFileUnreadable`] when the file
    /// cannot be read.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|source| AggregateError::PatternFileUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let mut matcher = Self::from_content(&content);
        matcher.source = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            rules = matcher.rules.len(),
            "loaded pattern file"
        );

        Ok(matcher)
    }

    /// Build a matcher from pattern file contents.
    ///
    /// Lines that are not valid patterns are skipped with a warning.
    pub fn from_content(content: &str) -> Self {
        let mut rules = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            match parse_line(line) {
                Ok(Some(rule)) => rules.push(rule),
                Ok(None) => {}, // Empty line or comment
                Err(e) => {
                    tracing::warn!(
                        "Invalid pattern on line {}: {} ({})",
                        line_num + 1,
                        line.trim(),
                        e
                    );
                },
            }
        }

        Self {
            rules,
            source: None,
        }
    }

    /// Evaluate the rules against `relative_path` alone.
    ///
    /// Ancestor directories are not considered; see [`Self::is_excluded`].
    pub fn check(&self, relative_path: &str, is_dir: bool) -> MatchOutcome {
        // Last matching rule decides, so search from the end
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(relative_path, is_dir))
            .map(|rule| match rule.pattern_type {
                PatternType::Ignore => MatchOutcome::Excluded(rule.original.clone()),
                PatternType::Include => MatchOutcome::Reincluded(rule.original.clone()),
            })
            .unwrap_or(MatchOutcome::Unmatched)
    }

    /// Check if a relative, `/`-separated path is excluded.
    ///
    /// A path inside an excluded directory is excluded as well, and no
    /// negated rule can bring it back.
    pub fn is_excluded(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        let path = relative_path.trim_matches('/');
        if path.is_empty() {
            return false;
        }

        for (idx, _) in path.match_indices('/') {
            if self.check(&path[..idx], true).is_excluded() {
                return true;
            }
        }

        self.check(path, is_dir).is_excluded()
    }

    /// Same as [`Self::is_excluded`] for a native relative path
    pub fn is_path_excluded(&self, relative_path: &Path, is_dir: bool) -> bool {
        self.is_excluded(&to_slash_path(relative_path), is_dir)
    }

    /// All compiled rules, in evaluation order
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Whether no rules were loaded
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pattern file the rules were loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

//! Gitignore-style exclusion rules
//!
//! This module compiles a pattern file into an ordered rule list and answers
//! "is this path excluded?" for paths relative to the scanned root. It
//! supports wildcards, `**`, negation, anchored and directory-only patterns.

pub mod matcher;
pub mod parser;

// Re-export commonly used items
pub use matcher::{IgnoreMatcher, MatchOutcome};
pub use parser::{IgnoreRule, PatternType};

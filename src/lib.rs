//! aggrefiles - aggregate a directory tree into a single file
//!
//! aggrefiles walks a root directory, selects the files ending with a given
//! extension and writes each file's relative path, its contents and a
//! separator line into one output file. A gitignore-style pattern file can
//! exclude files and whole directories; excluded directories are never
//! entered.
//!
//! # Core Features
//!
//! - **Gitignore Semantics**: `*`, `**`, `?`, negation, anchored and directory-only rules, last match wins
//! - **Pruning**: Excluded directories are skipped before they are listed
//! - **Streaming**: One file in memory at a time, written in a stable sorted order
//! - **Partial Failure**: Unreadable files are reported and skipped, the run goes on
//! - **Self-Reference Safety**: The output file is never read back as input
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use aggrefiles::{Aggregator, Extension, IgnoreMatcher};
//! use std::path::Path;
//!
//! let matcher = IgnoreMatcher::from_file(Path::new(".gitignore"))?;
//! let aggregator = Aggregator::new(Path::new("."), Extension::parse("md")?, matcher)?;
//!
//! let summary = aggregator.run(Path::new("all_docs.md"))?;
//! println!("wrote {} files", summary.files_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod core;
pub mod ignore;

// Re-export commonly used types
pub use crate::core::{
    error::{AggregateError, Result},
    types::{Extension, FileFailure, Summary},
};

pub use aggregate::{aggregate, AggregateProgress, Aggregator, Candidate};

pub use ignore::{IgnoreMatcher, MatchOutcome};

/// Current version of aggrefiles
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

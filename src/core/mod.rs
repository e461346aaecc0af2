//! Core types and utilities for aggrefiles
//!
//! This module contains the error taxonomy and the small value types shared
//! by the matcher, the aggregator and the CLI.

pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{AggregateError, Result};
pub use types::{to_slash_path, Extension, FileFailure, Summary};

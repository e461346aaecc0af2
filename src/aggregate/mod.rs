//! Streaming aggregation of a directory tree into one output file
//!
//! The walker yields candidate files lazily in a stable order, pruning
//! excluded directories before they are listed. The aggregator reads each
//! candidate, writes its record and drops the content before moving on, so
//! memory stays bounded by the largest single file.

pub mod aggregator;
pub mod walker;
pub mod writer;

// Re-export commonly used items
pub use aggregator::{aggregate, AggregateProgress, Aggregator};
pub use walker::{Candidate, Candidates, WalkStats};
pub use writer::{RecordWriter, SEPARATOR, SEPARATOR_WIDTH};

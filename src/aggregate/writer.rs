//! Output record formatting

use crate::core::error::{AggregateError, Result};
use std::io::Write;
use std::path::PathBuf;

/// Width of the separator line written after each record
pub const SEPARATOR_WIDTH: usize = 30;

/// Separator line written after each record (without the newline)
pub const SEPARATOR: &str = "------------------------------";

/// Streams output records into a writer.
///
/// Each record is:
///
/// ```text
/// <relative/path>
/// <contents, newline-terminated>
/// ------------------------------
/// ```
pub struct RecordWriter<W: Write> {
    out: W,
    /// Used in error messages
    destination: PathBuf,
    bytes_written: u64,
    records: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap `out`; `destination` names it in errors
    pub fn new(out: W, destination: impl Into<PathBuf>) -> Self {
        Self {
            out,
            destination: destination.into(),
            bytes_written: 0,
            records: 0,
        }
    }

    /// Write one record
    pub fn write_record(&mut self, relative_path: &str, content: &str) -> Result<()> {
        self.write_all(relative_path.as_bytes())?;
        self.write_all(b"\n")?;
        self.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            self.write_all(b"\n")?;
        }
        self.write_all(SEPARATOR.as_bytes())?;
        self.write_all(b"\n")?;

        self.records += 1;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.out
            .flush()
            .map_err(|e| AggregateError::output_write(&self.destination, e))?;
        Ok(self.out)
    }

    /// Bytes written so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.out
            .write_all(bytes)
            .map_err(|e| AggregateError::output_write(&self.destination, e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

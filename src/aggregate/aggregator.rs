//! Aggregation run: walk, read, stream records, summarize

use crate::aggregate::walker::Candidates;
use crate::aggregate::writer::RecordWriter;
use crate::core::error::{AggregateError, Result};
use crate::core::types::{Extension, FileFailure, Summary};
use crate::ignore::IgnoreMatcher;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// NUL bytes within this prefix mark a file as binary
const BINARY_PROBE_LEN: usize = 8000;

/// Progress is reported every this many matched files
const PROGRESS_INTERVAL: usize = 50;

/// Progress information during a run
#[derive(Debug, Clone, Default)]
pub struct AggregateProgress {
    /// Regular files visited so far
    pub files_seen: usize,
    /// Files selected for aggregation so far
    pub files_matched: usize,
    /// Records written so far
    pub files_written: usize,
    /// Current file being processed (if any)
    pub current_file: Option<String>,
    /// Elapsed time since the run started
    pub elapsed: Duration,
    /// Whether the run has finished
    pub done: bool,
}

type ProgressCallback = Box<dyn Fn(&AggregateProgress) + Send + Sync>;

/// Walks a root directory and concatenates matching files into one output
pub struct Aggregator {
    /// Canonical root directory
    root: PathBuf,
    /// Extension files must end with
    extension: Extension,
    /// Exclusion rules, fixed for the lifetime of the aggregator
    matcher: IgnoreMatcher,
    /// Whether to follow symbolic links
    follow_links: bool,
    /// Replace invalid UTF-8 instead of skipping the file
    lossy: bool,
    /// Progress callback function
    progress_callback: Option<ProgressCallback>,
}

impl Aggregator {
    /// Create an aggregator for `root`.
    ///
    /// Fails with [`AggregateError::InvalidRoot`] unless `root` is an
    /// existing, listable directory.
    pub fn new(root: &Path, extension: Extension, matcher: IgnoreMatcher) -> Result<Self> {
        let root = validate_root(root)?;

        Ok(Self {
            root,
            extension,
            matcher,
            follow_links: false,
            lossy: false,
            progress_callback: None,
        })
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Decode invalid UTF-8 with replacement characters instead of skipping
    pub fn lossy(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    /// Set progress callback for real-time updates
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&AggregateProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extension being aggregated
    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    /// Exclusion rules in use
    pub fn matcher(&self) -> &IgnoreMatcher {
        &self.matcher
    }

    /// Lazily walk the tree and yield the files that would be aggregated.
    ///
    /// `exclude` is a canonical path that is never yielded (the output file).
    pub fn candidates(&self, exclude: Option<&Path>) -> Result<Candidates<'_>> {
        Candidates::new(
            &self.root,
            &self.extension,
            &self.matcher,
            exclude,
            self.follow_links,
        )
    }

    /// Aggregate into `output_path`, truncating it if it exists.
    ///
    /// Missing parent directories are created. The output file is never
    /// read back as input, even when it lies inside the root.
    pub fn run(&self, output_path: &Path) -> Result<Summary> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| AggregateError::output_write(output_path, e))?;
            }
        }

        let file =
            File::create(output_path).map_err(|e| AggregateError::output_write(output_path, e))?;
        let canonical_output = dunce::canonicalize(output_path)
            .map_err(|e| AggregateError::output_write(output_path, e))?;

        tracing::debug!(output = %canonical_output.display(), "opened output");

        self.run_to_writer(BufWriter::new(file), Some(&canonical_output))
    }

    /// Aggregate into an arbitrary writer.
    ///
    /// `exclude` is a canonical path skipped during the walk; pass the
    /// output file's path when it may lie inside the root.
    pub fn run_to_writer<W: Write>(&self, out: W, exclude: Option<&Path>) -> Result<Summary> {
        let start_time = Instant::now();
        let destination = exclude
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("<stream>"));

        let mut candidates = self.candidates(exclude)?;
        let mut writer = RecordWriter::new(out, destination);
        let mut summary = Summary::default();
        let mut progress = AggregateProgress::default();

        while let Some(candidate) = candidates.next() {
            summary.files_matched += 1;

            match self.read_text(&candidate.path) {
                Ok(content) => {
                    writer.write_record(&candidate.relative, &content)?;
                    summary.files_written += 1;
                    tracing::debug!(path = %candidate.relative, bytes = content.len(), "aggregated");
                },
                Err(AggregateError::FileRead { reason, .. }) => {
                    tracing::warn!("Skipping {}: {}", candidate.relative, reason);
                    summary.files_skipped += 1;
                    summary.failures.push(FileFailure {
                        path: candidate.relative.clone(),
                        reason,
                    });
                },
                Err(e) => return Err(e),
            }

            if summary.files_matched % PROGRESS_INTERVAL == 0 {
                progress.files_seen = candidates.stats().files_seen;
                progress.files_matched = summary.files_matched;
                progress.files_written = summary.files_written;
                progress.current_file = Some(candidate.relative);
                progress.elapsed = start_time.elapsed();
                self.report_progress(&progress);
            }
        }

        let stats = candidates.stats();
        summary.files_ignored = stats.files_ignored;
        summary.dirs_pruned = stats.dirs_pruned;
        summary.walk_errors = stats.walk_errors;
        summary.bytes_written = writer.bytes_written();

        writer.finish()?;
        summary.elapsed = start_time.elapsed();

        progress.files_seen = stats.files_seen;
        progress.files_matched = summary.files_matched;
        progress.files_written = summary.files_written;
        progress.current_file = None;
        progress.elapsed = summary.elapsed;
        progress.done = true;
        self.report_progress(&progress);

        tracing::debug!(
            matched = summary.files_matched,
            written = summary.files_written,
            skipped = summary.files_skipped,
            "aggregation complete"
        );

        Ok(summary)
    }

    /// Read a file fully as text
    fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| AggregateError::file_read(path, e.to_string()))?;

        if looks_binary(&bytes) {
            return Err(AggregateError::file_read(path, "binary content"));
        }

        if self.lossy {
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        String::from_utf8(bytes).map_err(|e| {
            AggregateError::file_read(path, format!("invalid UTF-8: {}", e.utf8_error()))
        })
    }

    /// Report progress to callback
    fn report_progress(&self, progress: &AggregateProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

/// Aggregate every file under `root` ending with `extension` into
/// `output_path`, skipping paths excluded by `matcher`.
pub fn aggregate(
    root: &Path,
    extension: &str,
    output_path: &Path,
    matcher: IgnoreMatcher,
) -> Result<Summary> {
    let extension = Extension::parse(extension)?;
    Aggregator::new(root, extension, matcher)?.run(output_path)
}

fn validate_root(root: &Path) -> Result<PathBuf> {
    let metadata =
        fs::metadata(root).map_err(|e| AggregateError::invalid_root(root, e.to_string()))?;
    if !metadata.is_dir() {
        return Err(AggregateError::invalid_root(root, "not a directory"));
    }

    let canonical =
        dunce::canonicalize(root).map_err(|e| AggregateError::invalid_root(root, e.to_string()))?;
    fs::read_dir(&canonical).map_err(|e| AggregateError::invalid_root(root, e.to_string()))?;

    Ok(canonical)
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}

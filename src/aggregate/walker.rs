//! Lazy, pruning directory walk that yields aggregation candidates

use crate::core::error::{AggregateError, Result};
use crate::core::types::{to_slash_path, Extension};
use crate::ignore::{IgnoreMatcher, MatchOutcome};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file selected for aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path on disk, under the canonical root
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated
    pub relative: String,
}

/// Counters collected while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files visited (before any filtering)
    pub files_seen: usize,
    /// Files excluded by ignore rules
    pub files_ignored: usize,
    /// Directories excluded by ignore rules, never listed
    pub dirs_pruned: usize,
    /// Entries or directories that could not be accessed
    pub walk_errors: usize,
}

/// Children of one open directory, already sorted by name
struct DirLevel {
    entries: std::vec::IntoIter<fs::DirEntry>,
    /// Canonical path, tracked only when following links
    canonical: Option<PathBuf>,
}

/// Depth-first walk over the root, yielding files in sorted order.
///
/// Every directory is checked against the matcher before it is listed,
/// so excluded subtrees are never read. Walk errors are logged and counted
/// in [`WalkStats`]; they do not end the iteration.
pub struct Candidates<'a> {
    root: PathBuf,
    extension: &'a Extension,
    matcher: &'a IgnoreMatcher,
    exclude: Option<PathBuf>,
    follow_links: bool,
    stack: Vec<DirLevel>,
    stats: WalkStats,
}

impl<'a> Candidates<'a> {
    /// Start a walk at `root`, which must be a canonical directory path
    pub(crate) fn new(
        root: &Path,
        extension: &'a Extension,
        matcher: &'a IgnoreMatcher,
        exclude: Option<&Path>,
        follow_links: bool,
    ) -> Result<Self> {
        let (entries, errors) =
            read_sorted(root).map_err(|e| AggregateError::invalid_root(root, e.to_string()))?;

        let canonical = if follow_links {
            Some(root.to_path_buf())
        } else {
            None
        };

        let mut walk = Self {
            root: root.to_path_buf(),
            extension,
            matcher,
            exclude: exclude.map(Path::to_path_buf),
            follow_links,
            stack: vec![DirLevel {
                entries: entries.into_iter(),
                canonical,
            }],
            stats: WalkStats::default(),
        };
        for error in &errors {
            walk.walk_error(root, error);
        }

        Ok(walk)
    }

    /// Counters so far; final once the iterator is exhausted
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Classify one directory entry, descending or yielding as needed
    fn visit(&mut self, entry: fs::DirEntry) -> Option<Candidate> {
        let path = entry.path();
        let relative = match path.strip_prefix(&self.root) {
            Ok(rel) => to_slash_path(rel),
            Err(_) => return None,
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                self.walk_error(&path, &e);
                return None;
            },
        };

        let (is_dir, is_file) = if file_type.is_symlink() {
            if !self.follow_links {
                tracing::debug!(path = %relative, "skipping symlink");
                return None;
            }
            match fs::metadata(&path) {
                Ok(meta) => (meta.is_dir(), meta.is_file()),
                Err(e) => {
                    self.walk_error(&path, &e);
                    return None;
                },
            }
        } else {
            (file_type.is_dir(), file_type.is_file())
        };

        if is_dir {
            if let MatchOutcome::Excluded(rule) = self.matcher.check(&relative, true) {
                tracing::debug!(path = %relative, rule = %rule, "pruning directory");
                self.stats.dirs_pruned += 1;
            } else {
                self.descend(&path);
            }
            return None;
        }

        if !is_file {
            return None;
        }

        self.stats.files_seen += 1;

        if let MatchOutcome::Excluded(rule) = self.matcher.check(&relative, false) {
            tracing::debug!(path = %relative, rule = %rule, "ignoring file");
            self.stats.files_ignored += 1;
            return None;
        }

        if !self.extension.matches(&path) {
            return None;
        }

        if self.is_excluded_output(&path) {
            tracing::debug!(path = %relative, "skipping output file");
            return None;
        }

        Some(Candidate { path, relative })
    }

    /// Push a directory's sorted children onto the stack
    fn descend(&mut self, dir: &Path) {
        let canonical = if self.follow_links {
            match dunce::canonicalize(dir) {
                Ok(canonical) => {
                    let on_stack = self
                        .stack
                        .iter()
                        .any(|level| level.canonical.as_deref() == Some(canonical.as_path()));
                    if on_stack {
                        tracing::warn!("Skipping symlink loop at {}", dir.display());
                        self.stats.walk_errors += 1;
                        return;
                    }
                    Some(canonical)
                },
                Err(e) => {
                    self.walk_error(dir, &e);
                    return;
                },
            }
        } else {
            None
        };

        match read_sorted(dir) {
            Ok((entries, errors)) => {
                for error in &errors {
                    self.walk_error(dir, error);
                }
                self.stack.push(DirLevel {
                    entries: entries.into_iter(),
                    canonical,
                });
            },
            Err(e) => self.walk_error(dir, &e),
        }
    }

    fn is_excluded_output(&self, path: &Path) -> bool {
        let Some(output) = self.exclude.as_deref() else {
            return false;
        };

        if path == output {
            return true;
        }

        // Paths reached through symlinks are not canonical
        self.follow_links
            && dunce::canonicalize(path)
                .map(|canonical| canonical == output)
                .unwrap_or(false)
    }

    fn walk_error(&mut self, path: &Path, error: &io::Error) {
        tracing::warn!("Error accessing {}: {}", path.display(), error);
        self.stats.walk_errors += 1;
    }
}

impl Iterator for Candidates<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let level = self.stack.last_mut()?;
            match level.entries.next() {
                Some(entry) => {
                    if let Some(candidate) = self.visit(entry) {
                        return Some(candidate);
                    }
                },
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

/// List a directory, sorted by file name.
///
/// Entries that fail to read are returned separately; the rest of the
/// listing is kept.
fn read_sorted(dir: &Path) -> io::Result<(Vec<fs::DirEntry>, Vec<io::Error>)> {
    let (mut entries, errors) = split_entries(fs::read_dir(dir)?);
    entries.sort_by_key(|entry| entry.file_name());
    Ok((entries, errors))
}

fn split_entries<T>(results: impl Iterator<Item = io::Result<T>>) -> (Vec<T>, Vec<io::Error>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(e),
        }
    }
    (entries, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn canonical_root(temp_dir: &TempDir) -> Result<PathBuf> {
        Ok(dunce::canonicalize(temp_dir.path())?)
    }

    #[test]
    fn test_walk_is_sorted_depth_first() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = canonical_root(&temp_dir)?;

        fs::create_dir_all(root.join("b/inner"))?;
        fs::create_dir(root.join("a"))?;
        fs::write(root.join("z.txt"), "z")?;
        fs::write(root.join("b/inner/deep.txt"), "deep")?;
        fs::write(root.join("b/b.txt"), "b")?;
        fs::write(root.join("a/a.txt"), "a")?;
        fs::write(root.join("a/skip.md"), "md")?;

        let ext = Extension::parse("txt")?;
        let matcher = IgnoreMatcher::empty();
        let walk = Candidates::new(&root, &ext, &matcher, None, false)?;
        let relative: Vec<String> = walk.map(|c| c.relative).collect();

        assert_eq!(relative, vec!["a/a.txt", "b/b.txt", "b/inner/deep.txt", "z.txt"]);

        Ok(())
    }

    #[test]
    fn test_pruned_directories_are_counted() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = canonical_root(&temp_dir)?;

        fs::create_dir_all(root.join("build/nested"))?;
        fs::create_dir_all(root.join("src/build"))?;
        fs::write(root.join("build/nested/out.txt"), "x")?;
        fs::write(root.join("src/build/gen.txt"), "x")?;
        fs::write(root.join("src/lib.txt"), "x")?;
        fs::write(root.join("notes.log"), "x")?;

        let ext = Extension::parse("txt")?;
        let matcher = IgnoreMatcher::from_content("build/\n*.log\n");
        let mut walk = Candidates::new(&root, &ext, &matcher, None, false)?;
        let relative: Vec<String> = walk.by_ref().map(|c| c.relative).collect();

        assert_eq!(relative, vec!["src/lib.txt"]);

        let stats = walk.stats();
        assert_eq!(stats.dirs_pruned, 2);
        assert_eq!(stats.files_ignored, 1);
        // Files beneath pruned directories are never seen
        assert_eq!(stats.files_seen, 2);

        Ok(())
    }

    #[test]
    fn test_failed_entries_keep_siblings() {
        let results = vec![
            Ok("a.txt"),
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            Ok("b.txt"),
            Err(io::Error::new(io::ErrorKind::Other, "gone")),
        ];

        let (entries, errors) = split_entries(results.into_iter());

        assert_eq!(entries, vec!["a.txt", "b.txt"]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_excluded_output_is_skipped() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = canonical_root(&temp_dir)?;

        fs::write(root.join("a.txt"), "a")?;
        fs::write(root.join("out.txt"), "previous run")?;

        let ext = Extension::parse("txt")?;
        let matcher = IgnoreMatcher::empty();
        let output = root.join("out.txt");
        let walk = Candidates::new(&root, &ext, &matcher, Some(&output), false)?;
        let relative: Vec<String> = walk.map(|c| c.relative).collect();

        assert_eq!(relative, vec!["a.txt"]);

        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_only_followed_on_request() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = canonical_root(&temp_dir)?;

        fs::create_dir(root.join("real"))?;
        fs::write(root.join("real/file.txt"), "x")?;
        std::os::unix::fs::symlink(root.join("real"), root.join("link"))?;
        // Loop back to the root
        std::os::unix::fs::symlink(&root, root.join("real/up"))?;

        let ext = Extension::parse("txt")?;
        let matcher = IgnoreMatcher::empty();

        let walk = Candidates::new(&root, &ext, &matcher, None, false)?;
        let relative: Vec<String> = walk.map(|c| c.relative).collect();
        assert_eq!(relative, vec!["real/file.txt"]);

        let mut walk = Candidates::new(&root, &ext, &matcher, None, true)?;
        let relative: Vec<String> = walk.by_ref().map(|c| c.relative).collect();
        assert_eq!(relative, vec!["link/file.txt", "real/file.txt"]);
        assert!(walk.stats().walk_errors >= 1);

        Ok(())
    }
}

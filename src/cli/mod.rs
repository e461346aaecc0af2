//! Command-line interface for aggrefiles

use crate::config::Overrides;
use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

pub mod commands;

/// aggrefiles - concatenate every file with one extension into a single file
#[derive(Parser, Debug)]
#[command(
    name = "aggrefiles",
    version,
    about = "Aggregate files with a given extension into a single file",
    long_about = "Walks a directory tree, selects files ending with an extension and writes each file's relative path and contents, followed by a separator line, into one output file. Paths matching a gitignore-style pattern file are skipped."
)]
pub struct Cli {
    /// Root directory to search
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// File extension to match, with or without leading dot [default: .txt]
    #[arg(short, long, env = "AGGREFILES_EXT")]
    pub ext: Option<String>,

    /// Output file path, `-` for stdout [default: aggregated_output.txt]
    ///
    /// When stdout is redirected to a file under the root, that file is
    /// skipped like a regular output file.
    #[arg(short, long, env = "AGGREFILES_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Gitignore-style pattern file; matching files and folders are skipped
    #[arg(short, long, env = "AGGREFILES_GITIGNORE")]
    pub gitignore: Option<PathBuf>,

    /// Project configuration file [default: <root>/.aggrefiles.toml]
    #[arg(long, conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Do not look for a project configuration file
    #[arg(long)]
    pub no_config: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// Replace invalid UTF-8 instead of skipping the file
    #[arg(long)]
    pub lossy: bool,

    /// List the files that would be aggregated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub generate_completions: Option<Shell>,
}

/// When to colorize output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Command-line values that take precedence over the project config
    pub fn overrides(&self) -> Overrides {
        Overrides {
            ext: self.ext.clone(),
            output: self.output.clone(),
            gitignore: self.gitignore.clone(),
            follow_links: self.follow_links,
            lossy: self.lossy,
        }
    }

    /// Apply the `--color` choice to terminal output
    pub fn apply_color(&self) {
        match self.color {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {},
        }
    }
}

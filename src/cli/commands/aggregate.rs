//! Aggregate command implementation

use crate::aggregate::Aggregator;
use crate::cli::Cli;
use crate::config::{OutputTarget, ProjectConfig, Settings};
use crate::core::types::Summary;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

/// Execute an aggregation run
pub fn execute(cli: &Cli) -> Result<()> {
    // Everything that can fail on bad input happens before the output is touched
    let config = ProjectConfig::locate(&cli.root, cli.config.as_deref(), !cli.no_config)?;
    let settings = Settings::resolve(&cli.root, cli.overrides(), config)?;
    let matcher = settings.build_matcher()?;

    let aggregator = Aggregator::new(&settings.root, settings.extension.clone(), matcher)?
        .follow_links(settings.follow_links)
        .lossy(settings.lossy);

    tracing::debug!(
        root = %aggregator.root().display(),
        extension = %settings.extension,
        rules = aggregator.matcher().rules().len(),
        "starting aggregation"
    );

    if cli.dry_run {
        return dry_run(&aggregator, &settings, cli);
    }

    let spinner = if show_spinner(cli) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Aggregating files...");
        Some(spinner)
    } else {
        None
    };

    let aggregator = match &spinner {
        Some(spinner) => {
            let spinner = spinner.clone();
            aggregator.with_progress(move |progress| {
                spinner.set_message(format!(
                    "Aggregating files... {} written",
                    progress.files_written
                ));
            })
        },
        None => aggregator,
    };

    let result = match &settings.output {
        OutputTarget::File(path) => aggregator.run(path),
        OutputTarget::Stdout => {
            let redirect = redirected_stdout();
            aggregator.run_to_writer(BufWriter::new(io::stdout().lock()), redirect.as_deref())
        },
    };

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let summary = result?;
    report(&summary, &settings, cli)
}

/// Print the files that would be aggregated
fn dry_run(aggregator: &Aggregator, settings: &Settings, cli: &Cli) -> Result<()> {
    // An existing output file would be skipped by a real run too
    let exclude = match &settings.output {
        OutputTarget::File(path) => dunce::canonicalize(path).ok(),
        OutputTarget::Stdout => redirected_stdout(),
    };

    let files: Vec<String> = aggregator
        .candidates(exclude.as_deref())?
        .map(|candidate| candidate.relative)
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if !cli.quiet {
        println!("{}", "Files that would be aggregated:".bright_blue());
    }
    for file in &files {
        println!("  {} {}", "•".cyan(), file);
    }
    if !cli.quiet {
        println!("  • Would aggregate: {} file(s)", files.len());
    }

    Ok(())
}

/// Print the run summary
fn report(summary: &Summary, settings: &Settings, cli: &Cli) -> Result<()> {
    // Keep stdout clean when the aggregate itself goes there
    let to_stderr = settings.output == OutputTarget::Stdout;
    let emit = |line: String| {
        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    };

    if cli.json {
        emit(serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    if cli.quiet {
        return Ok(());
    }

    let destination = match &settings.output {
        OutputTarget::File(path) => path.display().to_string(),
        OutputTarget::Stdout => "stdout".to_string(),
    };

    if summary.files_matched == 0 {
        emit(format!(
            "{} No files with extension '{}' found under {}",
            "!".yellow(),
            settings.extension,
            settings.root.display()
        ));
    } else {
        emit(format!(
            "{} Aggregated {} file(s) into {}",
            "✓".green(),
            summary.files_written,
            destination.bold()
        ));
    }

    for failure in &summary.failures {
        emit(format!(
            "  {} Skipped {}: {}",
            "!".yellow(),
            failure.path,
            failure.reason
        ));
    }

    if cli.verbose {
        emit(format!("  • Files matched: {}", summary.files_matched));
        emit(format!("  • Files ignored by patterns: {}", summary.files_ignored));
        emit(format!("  • Directories pruned: {}", summary.dirs_pruned));
        if summary.walk_errors > 0 {
            emit(format!("  • Walk errors: {}", summary.walk_errors));
        }
        emit(format!("  • Bytes written: {}", summary.bytes_written));
        emit(format!(
            "  • Processing time: {:.2}s",
            summary.elapsed.as_secs_f64()
        ));
    }

    Ok(())
}

fn show_spinner(cli: &Cli) -> bool {
    !cli.quiet && !cli.no_progress && !cli.json && atty::is(atty::Stream::Stderr)
}

/// Canonical path of the regular file stdout is redirected to, if any
#[cfg(unix)]
fn redirected_stdout() -> Option<PathBuf> {
    let path = dunce::canonicalize("/dev/stdout").ok()?;
    path.is_file().then_some(path)
}

#[cfg(not(unix))]
fn redirected_stdout() -> Option<PathBuf> {
    None
}

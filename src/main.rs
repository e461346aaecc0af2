//! aggrefiles CLI
//!
//! Command-line interface for the aggrefiles directory aggregator.

use aggrefiles::cli::{commands, Cli};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    init_logging(&cli);
    cli.apply_color();

    if let Some(shell) = cli.generate_completions {
        return commands::completion::execute(shell);
    }

    commands::aggregate::execute(&cli)
}

/// Initialize logging; diagnostics go to stderr so stdout can carry output
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .init();
}

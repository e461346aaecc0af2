use crate::cli::Cli;
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io::{self, Write};

/// Generate shell completion scripts
pub fn execute(shell: Shell) -> Result<()> {
    write_script(shell, &mut io::stdout().lock())?;

    // Instructions go to stderr so the script can be piped
    let hint = match shell {
        Shell::Bash => "aggrefiles --generate-completions bash > ~/.local/share/bash-completion/completions/aggrefiles",
        Shell::Zsh => "aggrefiles --generate-completions zsh > ~/.local/share/zsh/site-functions/_aggrefiles",
        Shell::Fish => "aggrefiles --generate-completions fish > ~/.config/fish/completions/aggrefiles.fish",
        Shell::PowerShell => "aggrefiles --generate-completions powershell >> $PROFILE",
        _ => "Please refer to your shell's documentation for installing completion scripts.",
    };
    eprintln!("{} {}", "Install with:".bold(), hint.cyan());

    Ok(())
}

/// Write the completion script for `shell` into `out`
pub fn write_script(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "aggrefiles", out);
    out.flush()?;
    Ok(())
}

//! `pinauth completions <SHELL>` — print a completion script to stdout.
//!
//! clap validates the shell name, so this only renders the script:
//!
//!   pinauth completions bash > /etc/bash_completion.d/pinauth

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;
use crate::errors::Result;

/// Name the scripts complete, matching the installed binary.
const BIN_NAME: &str = "pinauth";

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    render(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn render(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    out.write_all(&buf)?;
    Ok(())
}

//! `pinauth version` — display version and the active file locations.

use console::style;

use crate::cli::{load_settings, Cli};
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute(cli: &Cli) -> Result<()> {
    println!("pinauth {}", env!("CARGO_PKG_VERSION"));

    let settings = load_settings(cli)?;
    println!("  {} {}", style("users:").dim(), settings.credential_path.display());
    println!("  {} {}", style("state:").dim(), settings.state_path.display());
    println!("  {} {}", style("retry budget:").dim(), settings.retry_budget);

    Ok(())
}

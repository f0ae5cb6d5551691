//! `pinauth reset` — clear a user's failed-attempt counter.

use crate::admin;
use crate::cli::output;
use crate::cli::{audit, load_settings, Cli};
use crate::errors::Result;

/// Execute the `reset` command.
pub fn execute(cli: &Cli, user: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let previous = admin::reset(&settings, user)?;

    audit(
        &settings,
        "reset",
        Some(user),
        Some(&format!("{previous} attempt(s) cleared")),
    );
    output::success(&format!("User {user} has been reset ({previous} attempt(s) cleared)"));

    Ok(())
}

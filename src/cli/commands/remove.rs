//! `pinauth remove` — delete a user from the credential file.

use dialoguer::Confirm;

use crate::admin;
use crate::cli::output;
use crate::cli::{audit, load_settings, Cli};
use crate::errors::{PinAuthError, Result};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, user: &str, force: bool) -> Result<()> {
    let settings = load_settings(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove user '{user}'?"))
            .default(false)
            .interact()
            .map_err(|e| PinAuthError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    admin::remove(&settings, user)?;

    audit(&settings, "remove", Some(user), None);
    output::success(&format!("User {user} removed"));

    Ok(())
}

//! `pinauth add` — add a user or change their PIN.

use crate::admin::{self, AddMode, AddOutcome};
use crate::cli::output;
use crate::cli::{audit, load_settings, prompt_new_pin, Cli};
use crate::errors::Result;
use crate::store::validate_username;

/// Execute the `add` command.
pub fn execute(cli: &Cli, user: &str, update: bool) -> Result<()> {
    // Reject bad names before asking for a PIN.
    validate_username(user)?;
    let settings = load_settings(cli)?;

    let pin = prompt_new_pin(user)?;
    let mode = if update {
        AddMode::Upsert
    } else {
        AddMode::CreateOnly
    };

    match admin::add(&settings, user, &pin, mode)? {
        AddOutcome::Added => {
            audit(&settings, "add", Some(user), Some("added"));
            output::success(&format!("User {user} added"));
        }
        AddOutcome::Updated => {
            audit(&settings, "update", Some(user), Some("PIN changed"));
            output::success(&format!("PIN updated for {user}"));
        }
    }

    Ok(())
}

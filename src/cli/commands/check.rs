//! `pinauth check` — verify a PIN without counting it as a login attempt.

use crate::admin;
use crate::cli::output;
use crate::cli::{load_settings, prompt_pin, Cli};
use crate::errors::{PinAuthError, Result};

/// Execute the `check` command.
///
/// Fails (exit code 1) when the PIN is wrong, after reporting the
/// user's attempt count.
pub fn execute(cli: &Cli, user: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let pin = prompt_pin("Enter PIN")?;

    let report = admin::check(&settings, user, &pin)?;
    drop(pin);

    if report.pin_valid {
        output::success("Valid PIN");
    }

    let mut line = format!("Attempts: {}/{}", report.attempts, settings.retry_budget);
    if report.locked {
        line.push_str(&format!(" (user {user} is locked)"));
    }
    output::info(&line);

    if report.locked {
        output::tip(&format!("Run `pinauth reset {user}` to unlock."));
    }

    if report.pin_valid {
        Ok(())
    } else {
        Err(PinAuthError::CommandFailed(format!("invalid PIN for {user}")))
    }
}

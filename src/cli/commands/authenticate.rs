//! `pinauth authenticate` — interactive login through the lockout engine.
//!
//! This is the terminal counterpart of the PAM hook: it prompts for the
//! PIN, counts failures toward lockout, and exits non-zero unless the
//! PIN was accepted. Unknown users and wrong PINs produce the same
//! message.

use crate::auth::{AuthEngine, Outcome, PinSource};
use crate::cli::output;
use crate::cli::{audit, load_settings, prompt_pin, Cli};
use crate::crypto::Pin;
use crate::errors::{PinAuthError, Result};

/// Reads PINs from the terminal (or piped stdin) and reports retries.
struct TerminalPinSource;

impl PinSource for TerminalPinSource {
    fn read_pin(&mut self) -> Result<Pin> {
        prompt_pin("Enter PIN")
    }

    fn notify_retry(&mut self, attempts: u8, budget: u8) {
        output::warning(&format!("Invalid PIN; retry ({attempts}/{budget})"));
    }
}

/// Execute the `authenticate` command.
pub fn execute(cli: &Cli, user: &str) -> Result<()> {
    let settings = load_settings(cli)?;
    let mut engine = AuthEngine::open(&settings)?;

    let outcome = match engine.authenticate(user, &mut TerminalPinSource) {
        Ok(outcome) => outcome,
        Err(e) => {
            audit(&settings, "authenticate", Some(user), Some("error"));
            return Err(e);
        }
    };

    match outcome {
        Outcome::Accepted => {
            audit(&settings, "authenticate", Some(user), Some("accepted"));
            output::success(&format!("Authenticated as {user}"));
            Ok(())
        }
        Outcome::Rejected => {
            audit(&settings, "authenticate", Some(user), Some("rejected"));
            Err(PinAuthError::CommandFailed("authentication failed".into()))
        }
        Outcome::Locked => {
            audit(&settings, "authenticate", Some(user), Some("locked"));
            Err(PinAuthError::CommandFailed(
                "too many failed attempts; ask an administrator to reset your PIN counter".into(),
            ))
        }
    }
}

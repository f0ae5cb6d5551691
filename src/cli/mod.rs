//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Settings, DEFAULT_CONFIG_PATH};
use crate::crypto::Pin;
use crate::errors::{PinAuthError, Result};

/// pinauth CLI: manage PIN credentials and lockout state.
#[derive(Parser)]
#[command(
    name = "pinauth",
    about = "Local PIN authentication manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(long, env = "PINAUTH_CONFIG", default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Credential file to use instead of the configured one
    #[arg(long, env = "PINAUTH_USERS_FILE", global = true)]
    pub users_file: Option<PathBuf>,

    /// Attempt-state file to use instead of the configured one
    #[arg(long, env = "PINAUTH_STATE_FILE", global = true)]
    pub state_file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// List all users and their PIN digests
    List,

    /// Add a user (prompts for the PIN; existing users need --update)
    Add {
        /// Replace the PIN of an existing user; without it, add refuses existing users
        #[arg(long)]
        update: bool,
        /// Username
        user: String,
    },

    /// Remove a user
    Remove {
        /// Username
        user: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check a user's PIN and show their failed-attempt count
    Check {
        /// Username
        user: String,
    },

    /// Reset a user's failed-attempt counter (unlocks the user)
    Reset {
        /// Username
        user: String,
    },

    /// Authenticate interactively, counting failures toward lockout
    Authenticate {
        /// Username
        user: String,
    },

    /// View the audit log of changes and logins
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config`, then apply the file overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(&cli.config)?;

    if let Some(ref path) = cli.users_file {
        settings.credential_path = path.clone();
    }
    if let Some(ref path) = cli.state_file {
        settings.state_path = path.clone();
    }

    settings.validate()?;
    Ok(settings)
}

/// Read one PIN.
///
/// On a terminal the input is hidden. When stdin is piped, one line is
/// read per PIN so scripts can feed PINs non-interactively. End of
/// input counts as a too-short PIN.
pub fn prompt_pin(prompt: &str) -> Result<Pin> {
    let text = if io::stdin().is_terminal() {
        let pin = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PinAuthError::CommandFailed(format!("PIN prompt: {e}")))?;
        Zeroizing::new(pin)
    } else {
        read_piped_line()?
    };

    Pin::parse(&text)
}

/// Prompt for a new PIN with confirmation (used by `add`).
///
/// Piped input is read once, without confirmation.
pub fn prompt_new_pin(user: &str) -> Result<Pin> {
    if !io::stdin().is_terminal() {
        let text = read_piped_line()?;
        return Pin::parse(&text);
    }

    loop {
        let pin = dialoguer::Password::new()
            .with_prompt(format!("Enter new PIN for {user}"))
            .with_confirmation("Confirm PIN", "PINs do not match, try again")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PinAuthError::CommandFailed(format!("PIN prompt: {e}")))?;
        let pin = Zeroizing::new(pin);

        match Pin::parse(&pin) {
            Ok(parsed) => return Ok(parsed),
            Err(e) if e.is_input_error() => {
                output::warning(&format!("{e}. Try again."));
            }
            Err(e) => return Err(e),
        }
    }
}

fn read_piped_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(PinAuthError::PinTooShort);
    }

    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Record an audit event when the audit log is compiled in.
pub fn audit(settings: &Settings, op: &str, user: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(settings, op, user, details);

    #[cfg(not(feature = "audit-log"))]
    let _ = (settings, op, user, details);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_add_with_update_flag() {
        let cli = Cli::parse_from(["pinauth", "add", "--update", "john"]);
        match cli.command {
            Commands::Add { update, ref user } => {
                assert!(update);
                assert_eq!(user, "john");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_add_without_update_flag() {
        let cli = Cli::parse_from(["pinauth", "add", "jane"]);
        assert!(matches!(cli.command, Commands::Add { update: false, .. }));
    }

    #[test]
    fn global_file_overrides_apply() {
        let dir = tempfile::TempDir::new().unwrap();
        let users = dir.path().join("u");
        let state = dir.path().join("s");
        let config = dir.path().join("missing.toml");

        let cli = Cli::parse_from([
            "pinauth",
            "list",
            "--config",
            config.to_str().unwrap(),
            "--users-file",
            users.to_str().unwrap(),
            "--state-file",
            state.to_str().unwrap(),
        ]);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.credential_path, users);
        assert_eq!(settings.state_path, state);
        assert_eq!(settings.retry_budget, 3);
    }

    #[test]
    fn same_file_for_both_stores_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let shared = dir.path().join("shared");
        let config = dir.path().join("missing.toml");

        let cli = Cli::parse_from([
            "pinauth",
            "list",
            "--config",
            config.to_str().unwrap(),
            "--users-file",
            shared.to_str().unwrap(),
            "--state-file",
            shared.to_str().unwrap(),
        ]);

        assert!(load_settings(&cli).is_err());
    }

    #[test]
    fn completions_takes_a_known_shell() {
        let cli = Cli::parse_from(["pinauth", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["pinauth", "completions", "csh"]).is_err());
    }

    #[test]
    fn remove_requires_user() {
        assert!(Cli::try_parse_from(["pinauth", "remove"]).is_err());
    }
}

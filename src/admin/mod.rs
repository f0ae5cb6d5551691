//! Administration operations behind the `pinauth` subcommands.
//!
//! Each function loads the store(s) it needs from the paths in
//! `Settings`, applies one change, and persists before returning, so
//! the CLI layer only prompts and prints.

use tracing::info;

use crate::config::Settings;
use crate::crypto::{hash_pin, Pin};
use crate::errors::{PinAuthError, Result};
use crate::store::{validate_username, AttemptStore, Credential, CredentialStore};

/// Whether `add` may overwrite an existing user's PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddMode {
    /// Fail with `UserAlreadyExists` if the user is present.
    CreateOnly,
    /// Add the user or replace their PIN.
    Upsert,
}

/// What `add` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Updated,
}

/// Result of `check`: PIN validity plus the user's lockout state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub username: String,
    pub pin_valid: bool,
    pub attempts: u8,
    pub locked: bool,
}

/// All credentials in file order.
pub fn list(settings: &Settings) -> Result<Vec<Credential>> {
    let store = CredentialStore::open(&settings.credential_path)?;
    Ok(store.iter().collect())
}

/// Hash `pin` and store it for `username`.
pub fn add(settings: &Settings, username: &str, pin: &Pin, mode: AddMode) -> Result<AddOutcome> {
    let mut store = CredentialStore::open(&settings.credential_path)?;

    let existed = store.contains(username);
    if existed && mode == AddMode::CreateOnly {
        return Err(PinAuthError::UserAlreadyExists(username.to_string()));
    }

    let digest = hash_pin(pin)?;
    store.update(username, digest)?;
    store.dump(&settings.credential_path)?;

    let outcome = if existed {
        AddOutcome::Updated
    } else {
        AddOutcome::Added
    };
    info!(user = username, ?outcome, "credential stored");
    Ok(outcome)
}

/// Delete `username` from the credential file.
pub fn remove(settings: &Settings, username: &str) -> Result<()> {
    let mut store = CredentialStore::open(&settings.credential_path)?;
    store.remove(username)?;
    store.dump(&settings.credential_path)?;
    info!(user = username, "credential removed");
    Ok(())
}

/// Verify `pin` for `username` without touching the attempt counter.
pub fn check(settings: &Settings, username: &str, pin: &Pin) -> Result<CheckReport> {
    let store = CredentialStore::open(&settings.credential_path)?;
    let credential = store
        .find(username)
        .ok_or_else(|| PinAuthError::UserNotFound(username.to_string()))?;

    let digest = hash_pin(pin)?;
    let attempts = AttemptStore::open(&settings.state_path)?.get(username);

    Ok(CheckReport {
        username: username.to_string(),
        pin_valid: credential.verify(&digest),
        attempts,
        locked: attempts >= settings.retry_budget,
    })
}

/// Clear the failed-attempt counter for `username`.
///
/// Always writes the attempt file. Returns the count before the reset.
pub fn reset(settings: &Settings, username: &str) -> Result<u8> {
    validate_username(username)?;
    let mut attempts = AttemptStore::open(&settings.state_path)?;
    let previous = attempts.get(username);
    attempts.set(username, 0);
    attempts.save(&settings.state_path)?;
    info!(user = username, previous, "attempt counter reset");
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        Settings {
            credential_path: dir.path().join("users"),
            state_path: dir.path().join("attempts"),
            retry_budget: 3,
        }
    }

    fn pin(text: &str) -> Pin {
        Pin::parse(text).unwrap()
    }

    #[test]
    fn add_creates_file_and_lists_user() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);

        let outcome = add(&s, "john", &pin("1234"), AddMode::CreateOnly).unwrap();
        assert_eq!(outcome, AddOutcome::Added);

        let users = list(&s).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "john");
        assert_eq!(
            users[0].digest.to_hex(),
            "9f64a747e1b97f131fabb6b447296c9b6f0201e79fb3c5356e6c77e89b6a806a"
        );
    }

    #[test]
    fn add_without_update_refuses_existing_user() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        add(&s, "john", &pin("1234"), AddMode::CreateOnly).unwrap();

        let err = add(&s, "john", &pin("5678"), AddMode::CreateOnly).unwrap_err();
        assert!(matches!(err, PinAuthError::UserAlreadyExists(_)));

        // First PIN still valid.
        assert!(check(&s, "john", &pin("1234")).unwrap().pin_valid);
    }

    #[test]
    fn add_with_update_replaces_pin() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        add(&s, "john", &pin("1234"), AddMode::CreateOnly).unwrap();

        let outcome = add(&s, "john", &pin("5678"), AddMode::Upsert).unwrap();
        assert_eq!(outcome, AddOutcome::Updated);

        assert!(!check(&s, "john", &pin("1234")).unwrap().pin_valid);
        assert!(check(&s, "john", &pin("5678")).unwrap().pin_valid);
        assert_eq!(list(&s).unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_user_fails() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        add(&s, "john", &pin("1234"), AddMode::CreateOnly).unwrap();

        assert!(matches!(
            remove(&s, "jane"),
            Err(PinAuthError::UserNotFound(_))
        ));
        assert_eq!(list(&s).unwrap().len(), 1);

        remove(&s, "john").unwrap();
        assert!(list(&s).unwrap().is_empty());
    }

    #[test]
    fn check_reports_lockout_without_mutating() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        add(&s, "john", &pin("1234"), AddMode::CreateOnly).unwrap();
        std::fs::write(&s.state_path, "john:3\n").unwrap();

        let report = check(&s, "john", &pin("0000")).unwrap();
        assert!(!report.pin_valid);
        assert_eq!(report.attempts, 3);
        assert!(report.locked);

        assert_eq!(std::fs::read_to_string(&s.state_path).unwrap(), "john:3\n");
    }

    #[test]
    fn check_unknown_user_fails() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        assert!(matches!(
            check(&s, "ghost", &pin("1234")),
            Err(PinAuthError::UserNotFound(_))
        ));
    }

    #[test]
    fn reset_clears_counter_and_writes_file() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);
        std::fs::write(&s.state_path, "john:3\njane:1\n").unwrap();

        let previous = reset(&s, "john").unwrap();
        assert_eq!(previous, 3);
        assert_eq!(
            std::fs::read_to_string(&s.state_path).unwrap(),
            "john:0\njane:1\n"
        );
    }

    #[test]
    fn reset_rejects_name_with_separator() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);

        assert!(matches!(
            reset(&s, "jo:hn"),
            Err(PinAuthError::InvalidUsername { .. })
        ));
        assert!(!s.state_path.exists());
    }

    #[test]
    fn reset_unknown_user_still_persists() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir);

        assert_eq!(reset(&s, "nobody").unwrap(), 0);
        assert_eq!(
            std::fs::read_to_string(&s.state_path).unwrap(),
            "nobody:0\n"
        );
    }
}

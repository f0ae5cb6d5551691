//! Authenticate-with-lockout.
//!
//! The engine walks one authentication through these states:
//!
//! ```text
//! Start -> CounterLoaded -> Locked
//!                        -> Retrying -> Accepted | Rejected
//! ```
//!
//! - Unknown users are rejected before any counter is read or written.
//! - A user whose counter already reached the retry budget is `Locked`
//!   and is never asked for a PIN.
//! - Inside the retry loop every counter change is saved before the next
//!   prompt, so killing the process mid-loop cannot reset lockout progress.
//! - A hash failure aborts with an error and consumes no attempt.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::crypto::{Pin, PinHasher, Sha256Hasher};
use crate::errors::Result;
use crate::store::{AttemptStore, CredentialStore};

/// Terminal state of one authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The PIN matched; the counter is back to zero.
    Accepted,
    /// Unknown user, or the retry budget ran out during this call.
    Rejected,
    /// The budget was already exhausted; no PIN was requested.
    Locked,
}

impl Outcome {
    pub fn is_accepted(self) -> bool {
        self == Outcome::Accepted
    }
}

/// Where PINs come from: a terminal prompt, a PAM conversation, a test.
pub trait PinSource {
    /// Ask for one PIN.
    ///
    /// Malformed or aborted input should be returned as an error; the
    /// engine counts any error here as a failed attempt.
    fn read_pin(&mut self) -> Result<Pin>;

    /// Called after each failed attempt with the new count and the budget.
    fn notify_retry(&mut self, _attempts: u8, _budget: u8) {}
}

/// Combines the credential store, the attempt store and a hasher into
/// the lockout protocol.
pub struct AuthEngine<H = Sha256Hasher> {
    credentials: CredentialStore,
    attempts: AttemptStore,
    state_path: PathBuf,
    retry_budget: u8,
    hasher: H,
}

impl AuthEngine<Sha256Hasher> {
    /// Load both stores from the paths in `settings`.
    pub fn open(settings: &Settings) -> Result<Self> {
        debug!(path = %settings.credential_path.display(), "loading credential file");
        let credentials = CredentialStore::open(&settings.credential_path)?;
        debug!(path = %settings.state_path.display(), "loading attempt file");
        let attempts = AttemptStore::open(&settings.state_path)?;
        Ok(Self::new(credentials, attempts, settings))
    }

    /// Build an engine from already-loaded stores.
    pub fn new(credentials: CredentialStore, attempts: AttemptStore, settings: &Settings) -> Self {
        Self::with_hasher(credentials, attempts, settings, Sha256Hasher)
    }
}

impl<H: PinHasher> AuthEngine<H> {
    /// Build an engine with a custom hasher.
    pub fn with_hasher(
        credentials: CredentialStore,
        attempts: AttemptStore,
        settings: &Settings,
        hasher: H,
    ) -> Self {
        Self {
            credentials,
            attempts,
            state_path: settings.state_path.clone(),
            retry_budget: settings.retry_budget,
            hasher,
        }
    }

    /// Run one authentication for `username`, pulling PINs from `source`.
    ///
    /// Returns an error only for conditions that prevent a verdict
    /// (hash failure, attempt file cannot be written). Callers must treat
    /// an error as a failed authentication.
    pub fn authenticate<S>(&mut self, username: &str, source: &mut S) -> Result<Outcome>
    where
        S: PinSource + ?Sized,
    {
        info!(user = username, "authentication started");

        let Some(credential) = self.credentials.find(username) else {
            info!(user = username, "no credential for user");
            return Ok(Outcome::Rejected);
        };

        let mut attempts = self.attempts.get(username);
        if attempts >= self.retry_budget {
            info!(
                user = username,
                attempts,
                budget = self.retry_budget,
                "too many attempts, skipping PIN check"
            );
            return Ok(Outcome::Locked);
        }

        while attempts < self.retry_budget {
            debug!(user = username, attempts, "reading PIN");
            let pin = match source.read_pin() {
                Ok(pin) => pin,
                Err(e) => {
                    warn!(user = username, error = %e, "unusable PIN input");
                    attempts = self.record_failure(username, attempts)?;
                    source.notify_retry(attempts, self.retry_budget);
                    continue;
                }
            };

            let digest = self.hasher.hash(&pin);
            drop(pin);
            let digest = match digest {
                Ok(d) => d,
                Err(e) => {
                    warn!(user = username, error = %e, "cannot compute PIN digest");
                    return Err(e);
                }
            };

            if credential.verify(&digest) {
                self.attempts.set(username, 0);
                self.attempts.save(&self.state_path)?;
                info!(user = username, "PIN verified");
                return Ok(Outcome::Accepted);
            }

            info!(user = username, "invalid PIN");
            attempts = self.record_failure(username, attempts)?;
            source.notify_retry(attempts, self.retry_budget);
        }

        info!(user = username, attempts, "retry budget exhausted");
        Ok(Outcome::Rejected)
    }

    /// Bump and persist the counter; returns the new value.
    fn record_failure(&mut self, username: &str, attempts: u8) -> Result<u8> {
        let next = attempts.saturating_add(1);
        self.attempts.set(username, next);
        self.attempts.save(&self.state_path)?;
        Ok(next)
    }

    /// Read-only view of the attempt counters.
    pub fn attempts(&self) -> &AttemptStore {
        &self.attempts
    }

    /// Read-only view of the credentials.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn retry_budget(&self) -> u8 {
        self.retry_budget
    }
}

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Stage of the digest computation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashStage {
    ContextInit,
    DigestInit,
    DigestUpdate,
    DigestFinal,
}

impl fmt::Display for HashStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            HashStage::ContextInit => "could not create hash context",
            HashStage::DigestInit => "could not initialize digest",
            HashStage::DigestUpdate => "could not update digest",
            HashStage::DigestFinal => "could not finalize digest",
        };
        f.write_str(msg)
    }
}

/// All errors that can occur in pinauth.
#[derive(Debug, Error)]
pub enum PinAuthError {
    // --- IO errors ---
    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not access {0} — permission denied")]
    Access(PathBuf),

    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not close {path}: {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Format errors ---
    #[error("Invalid file format in {path} (line {line}): {reason}")]
    InvalidFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    // --- User errors ---
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("User '{0}' already exists (use `add --update` to change the PIN)")]
    UserAlreadyExists(String),

    #[error("Invalid username '{name}': {reason}")]
    InvalidUsername { name: String, reason: String },

    // --- Hash errors ---
    #[error("PIN hashing failed: {0}")]
    Hash(HashStage),

    // --- Input errors ---
    #[error("Invalid PIN — expected exactly 4 digits")]
    PinTooShort,

    #[error("Invalid PIN — only digits 0-9 are allowed")]
    PinBadCharacter,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl PinAuthError {
    /// Whether this error came from malformed PIN input rather than the system.
    pub fn is_input_error(&self) -> bool {
        matches!(self, PinAuthError::PinTooShort | PinAuthError::PinBadCharacter)
    }
}

/// Convenience type alias for pinauth results.
pub type Result<T> = std::result::Result<T, PinAuthError>;

//! Store module — durable, file-backed tables.
//!
//! This module provides:
//! - `CredentialStore`: username -> PIN digest (`credentials`)
//! - `AttemptStore`: username -> failed-attempt counter (`attempts`)
//! - Shared line-file I/O and username validation (`file`)

pub mod attempts;
pub mod credentials;
pub mod file;

// Re-export the most commonly used items.
pub use attempts::{AttemptRecord, AttemptStore};
pub use credentials::{Credential, CredentialStore};
pub use file::validate_username;

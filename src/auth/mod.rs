//! Authentication module — the PIN verification protocol with lockout.
//!
//! Front ends (the `authenticate` command, a PAM hook) supply a
//! `PinSource` and map the returned `Outcome` onto their own
//! success/failure signalling.

pub mod engine;

pub use engine::{AuthEngine, Outcome, PinSource};

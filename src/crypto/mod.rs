//! Cryptographic primitives for pinauth.
//!
//! This module provides:
//! - The zeroizing `Pin` secret type (`pin`)
//! - SHA-256 PIN digests and the `PinHasher` seam (`digest`)

pub mod digest;
pub mod pin;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{hash_pin, Pin, PinDigest};
pub use digest::{hash_pin, PinDigest, PinHasher, Sha256Hasher, DIGEST_HEX_LEN, DIGEST_LEN};
pub use pin::{Pin, PIN_LEN};

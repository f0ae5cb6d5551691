//! PIN hashing.
//!
//! A PIN digest is plain SHA-256 over the four raw digit values (not
//! their ASCII codes). On disk it is written as 64 lowercase hex
//! characters.

use std::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::pin::Pin;
use crate::errors::Result;

/// Length of a digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of a digest rendered as hex.
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// A SHA-256 PIN digest.
///
/// Equality is constant-time so comparing a candidate against a stored
/// digest does not leak how many leading bytes matched.
#[derive(Clone, Copy)]
pub struct PinDigest([u8; DIGEST_LEN]);

impl PinDigest {
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the 64-character hex form. Returns `None` on any malformed input.
    ///
    /// Uppercase digits are accepted; `to_hex` always writes lowercase, so
    /// the next dump normalizes them.
    pub fn from_hex(input: &str) -> Option<Self> {
        if input.len() != DIGEST_HEX_LEN {
            return None;
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(input, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl PartialEq for PinDigest {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for PinDigest {}

impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinDigest({})", self.to_hex())
    }
}

impl fmt::Display for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes PIN digests.
///
/// Failures are reported as `PinAuthError::Hash` and mean "cannot
/// verify", never "wrong PIN".
pub trait PinHasher {
    fn hash(&self, pin: &Pin) -> Result<PinDigest>;
}

/// The production hasher: SHA-256 over the raw digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PinHasher for Sha256Hasher {
    fn hash(&self, pin: &Pin) -> Result<PinDigest> {
        let mut hasher = Sha256::new();
        hasher.update(pin.as_bytes());
        Ok(PinDigest(hasher.finalize().into()))
    }
}

/// Hash a PIN with the default hasher.
pub fn hash_pin(pin: &Pin) -> Result<PinDigest> {
    Sha256Hasher.hash(pin)
}

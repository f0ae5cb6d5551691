//! The raw PIN secret.
//!
//! A `Pin` holds four already-decoded digit values (0-9, not ASCII) and
//! wipes them when dropped, so every exit path of a caller clears the
//! secret without explicit cleanup.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{PinAuthError, Result};

/// Number of digits in a PIN.
pub const PIN_LEN: usize = 4;

/// A 4-digit numeric PIN, zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Pin {
    digits: [u8; PIN_LEN],
}

impl Pin {
    /// Build a PIN from decoded digit values.
    ///
    /// Every value must be in `0..=9`.
    pub fn from_digits(digits: [u8; PIN_LEN]) -> Result<Self> {
        if digits.iter().any(|d| *d > 9) {
            return Err(PinAuthError::PinBadCharacter);
        }
        Ok(Self { digits })
    }

    /// Parse PIN text as typed by a user (e.g. `"1234"`).
    ///
    /// The input must be exactly four ASCII digits. A wrong length,
    /// including empty input, is `PinTooShort`; any other character is
    /// `PinBadCharacter`.
    pub fn parse(input: &str) -> Result<Self> {
        let bytes = input.as_bytes();
        if bytes.len() != PIN_LEN {
            return Err(PinAuthError::PinTooShort);
        }

        let mut digits = [0u8; PIN_LEN];
        for (slot, b) in digits.iter_mut().zip(bytes) {
            if !b.is_ascii_digit() {
                digits.zeroize();
                return Err(PinAuthError::PinBadCharacter);
            }
            *slot = b - b'0';
        }

        let pin = Self { digits };
        digits.zeroize();
        Ok(pin)
    }

    /// The raw digit values, fed to the hasher.
    pub fn as_bytes(&self) -> &[u8; PIN_LEN] {
        &self.digits
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

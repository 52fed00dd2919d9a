//! The key material derived from a password and salt.
//!
//! `DerivedKeySet` is the single value handed to both the encrypt and the
//! decrypt path. It is derived once per operation and zeroed when dropped,
//! so an early return (for example on an HMAC mismatch) still wipes it.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::cipher::{CipherEngine, Mode};
use crate::consts::{IV_LEN, KDF_OUTPUT_LEN, KEY_LEN};
use crate::errors::Result;

/// Cipher key, HMAC key and CTR initial counter for one vault payload.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeySet {
    cipher_key: [u8; KEY_LEN],
    mac_key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl DerivedKeySet {
    /// Slice the 80-byte KDF output as `cipher_key | mac_key | iv`.
    pub(crate) fn from_kdf_output(okm: &[u8; KDF_OUTPUT_LEN]) -> Self {
        let mut keys = Self {
            cipher_key: [0u8; KEY_LEN],
            mac_key: [0u8; KEY_LEN],
            iv: [0u8; IV_LEN],
        };
        keys.cipher_key.copy_from_slice(&okm[..KEY_LEN]);
        keys.mac_key.copy_from_slice(&okm[KEY_LEN..2 * KEY_LEN]);
        keys.iv.copy_from_slice(&okm[2 * KEY_LEN..]);
        keys
    }

    /// AES-256 key bytes.
    pub fn cipher_key(&self) -> &[u8; KEY_LEN] {
        &self.cipher_key
    }

    /// HMAC-SHA256 key bytes.
    pub fn mac_key(&self) -> &[u8; KEY_LEN] {
        &self.mac_key
    }

    /// Initial 128-bit counter block.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Build a cipher engine keyed from this set.
    pub fn cipher(&self, mode: Mode) -> Result<CipherEngine> {
        CipherEngine::new(self, mode)
    }
}

impl fmt::Debug for DerivedKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKeySet([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_key_bytes() {
        let okm = [0x41u8; KDF_OUTPUT_LEN];
        let keys = DerivedKeySet::from_kdf_output(&okm);
        let shown = format!("{keys:?}");
        assert_eq!(shown, "DerivedKeySet([REDACTED])");
    }

    #[test]
    fn zeroize_clears_every_slice() {
        let mut okm = [0u8; KDF_OUTPUT_LEN];
        for (i, b) in okm.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        let mut keys = DerivedKeySet::from_kdf_output(&okm);
        assert_eq!(keys.iv()[0], 65);

        keys.zeroize();
        assert!(keys.cipher_key().iter().all(|&b| b == 0));
        assert!(keys.mac_key().iter().all(|&b| b == 0));
        assert!(keys.iv().iter().all(|&b| b == 0));
    }
}

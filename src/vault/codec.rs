//! Encrypt and decrypt vault payloads.
//!
//! `Encryptor` and `Decryptor` are independent types that each own one
//! `DerivedKeySet`, derived exactly once when the instance is built. The
//! keys are wiped when the instance is dropped, which also covers the
//! early return on an HMAC mismatch.

use std::fmt;

use zeroize::Zeroizing;

use super::format::VaultFrame;
use crate::consts::SALT_LEN;
use crate::crypto::{compute_hmac, derive_keys, generate_salt, pad, unpad, verify_hmac};
use crate::crypto::{DerivedKeySet, Mode};
use crate::errors::Result;

// ---------------------------------------------------------------------------
// Encryptor
// ---------------------------------------------------------------------------

/// Encrypts plaintext under a password with a fresh random salt.
pub struct Encryptor {
    salt: [u8; SALT_LEN],
    keys: DerivedKeySet,
}

impl Encryptor {
    /// Generate a salt and derive keys for it.
    pub fn new(password: &[u8]) -> Result<Self> {
        Self::with_salt(password, generate_salt())
    }

    /// Derive keys for a caller-chosen salt.
    ///
    /// Reusing a salt with the same password reuses the CTR keystream;
    /// only use this for reproducible fixtures.
    pub fn with_salt(password: &[u8], salt: [u8; SALT_LEN]) -> Result<Self> {
        let keys = derive_keys(password, &salt)?;
        Ok(Self { salt, keys })
    }

    /// Pad, encrypt, and MAC `plaintext` into a new frame.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<VaultFrame> {
        let padded = pad(plaintext);

        // Ciphertext is public, so it leaves the zeroizing wrapper.
        let mut ciphertext = padded.to_vec();
        self.keys.cipher(Mode::Encrypt)?.process(&mut ciphertext);

        let mac = compute_hmac(self.keys.mac_key(), &ciphertext)?;
        Ok(VaultFrame::new(self.salt.to_vec(), mac, ciphertext))
    }
}

impl fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryptor").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Decryptor
// ---------------------------------------------------------------------------

/// Verifies and decrypts frames sealed with one salt + password pair.
pub struct Decryptor {
    keys: DerivedKeySet,
}

impl Decryptor {
    /// Derive keys from the frame's salt.
    pub fn for_frame(frame: &VaultFrame, password: &[u8]) -> Result<Self> {
        let keys = derive_keys(password, frame.salt())?;
        Ok(Self { keys })
    }

    /// Check the HMAC, then decrypt and strip padding.
    ///
    /// The plaintext is returned in a zeroizing buffer; it is wiped when
    /// the caller drops it.
    pub fn decrypt(&self, frame: &VaultFrame) -> Result<Zeroizing<Vec<u8>>> {
        verify_hmac(self.keys.mac_key(), frame.ciphertext(), frame.mac())?;

        let mut plaintext = Zeroizing::new(frame.ciphertext().to_vec());
        self.keys.cipher(Mode::Decrypt)?.process(&mut plaintext);
        unpad(&mut plaintext);
        Ok(plaintext)
    }
}

impl fmt::Debug for Decryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decryptor").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// One-shot helpers
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` under `password` with a fresh salt.
pub fn encrypt(plaintext: &[u8], password: &[u8]) -> Result<VaultFrame> {
    Encryptor::new(password)?.encrypt(plaintext)
}

/// Decrypt `frame` with `password`.
pub fn decrypt(frame: &VaultFrame, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    Decryptor::for_frame(frame, password)?.decrypt(frame)
}

//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The vault format fixes every parameter: 10 000 rounds, SHA-256, and an
//! 80-byte output that is sliced into the cipher key, the HMAC key, and
//! the CTR initial counter block.

use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::keys::DerivedKeySet;
use crate::consts::{KDF_ITERATIONS, KDF_OUTPUT_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};

/// Derive the full key set for one encryption or decryption.
///
/// The same password + salt always produce the same keys. The raw KDF
/// output is wiped as soon as the three slices have been copied out.
pub fn derive_keys(password: &[u8], salt: &[u8]) -> Result<DerivedKeySet> {
    if salt.is_empty() {
        return Err(VaultError::MissingSalt);
    }

    let mut okm = Zeroizing::new([0u8; KDF_OUTPUT_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, KDF_ITERATIONS, okm.as_mut_slice());

    tracing::debug!(salt_len = salt.len(), "derived vault keys");
    Ok(DerivedKeySet::from_kdf_output(&okm))
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

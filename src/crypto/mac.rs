//! HMAC-SHA256 over the ciphertext, rendered as lowercase hex.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::errors::{Result, VaultError};

/// Compute HMAC-SHA256(`mac_key`, `ciphertext`) as 64 lowercase hex chars.
pub fn compute_hmac(mac_key: &[u8], ciphertext: &[u8]) -> Result<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(mac_key)
        .map_err(|e| VaultError::CipherError(format!("invalid HMAC key: {e}")))?;
    mac.update(ciphertext);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a stored hex HMAC against the one calculated over `ciphertext`.
///
/// The comparison runs in constant time. A stored value of the wrong
/// length simply fails to match.
pub fn verify_hmac(mac_key: &[u8], ciphertext: &[u8], stored_hex: &str) -> Result<()> {
    let calculated = compute_hmac(mac_key, ciphertext)?;
    if bool::from(calculated.as_bytes().ct_eq(stored_hex.as_bytes())) {
        Ok(())
    } else {
        Err(VaultError::HmacMismatch)
    }
}

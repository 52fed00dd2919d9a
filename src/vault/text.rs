//! Vault text that lives outside a file, such as `!vault` YAML scalars.

use zeroize::{Zeroize, Zeroizing};

use super::codec::{Decryptor, Encryptor};
use super::format::{split_envelope, VaultFrame};
use crate::consts::{VAULT_HEADER, VAULT_TAG};
use crate::errors::{Result, VaultError};

/// Decrypt a vault-framed string.
///
/// Text that is not vault-framed (wrong header, or an HMAC segment of the
/// wrong length) is returned unchanged. A vault header followed by an
/// undecodable body is `MalformedFrame`.
pub fn decrypt_text(text: &str, password: &str) -> Result<Zeroizing<String>> {
    let (header, body) = split_envelope(text.as_bytes());
    if header != VAULT_HEADER {
        return Ok(Zeroizing::new(text.to_string()));
    }

    let frame = VaultFrame::from_parts(header, &body)?;
    if !frame.is_encrypted_format() {
        tracing::warn!("vault header present but hmac segment has the wrong length, passing text through");
        return Ok(Zeroizing::new(text.to_string()));
    }

    let mut plaintext = Decryptor::for_frame(&frame, password.as_bytes())?.decrypt(&frame)?;
    into_secret_string(std::mem::take(&mut *plaintext))
}

/// Encrypt `plaintext` and return the vault text (header + wrapped body).
pub fn encrypt_text(plaintext: &str, password: &str) -> Result<String> {
    let frame = Encryptor::new(password.as_bytes())?.encrypt(plaintext.as_bytes())?;
    Ok(frame.encode())
}

/// Render vault text as a `!vault` literal block scalar.
///
/// With a `name` the result is a one-entry YAML mapping, ready to paste
/// into a vars file:
///
/// ```text
/// db_password: !vault |
///   $ANSIBLE_VAULT;1.1;AES256
///   3863...
/// ```
pub fn format_vault_scalar(name: Option<&str>, vault_text: &str) -> String {
    let mut out = String::with_capacity(vault_text.len() + vault_text.len() / 40 + 32);
    if let Some(name) = name {
        out.push_str(name);
        out.push_str(": ");
    }
    out.push_str(VAULT_TAG);
    out.push_str(" |\n");
    for line in vault_text.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Convert decrypted bytes into a `String` without leaving a copy behind.
pub(crate) fn into_secret_string(bytes: Vec<u8>) -> Result<Zeroizing<String>> {
    String::from_utf8(bytes).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::InvalidUtf8("vault text")
    })
}

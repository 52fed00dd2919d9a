//! The line-oriented vault 1.1 envelope.
//!
//! A vault file (or a `!vault` YAML scalar) has this layout:
//!
//! ```text
//! $ANSIBLE_VAULT;1.1;AES256
//! hex( hex(salt) \n hmac_hex \n hex(ciphertext) ), wrapped at 80 columns
//! ```
//!
//! - **Header**: fixed literal identifying format version and cipher.
//! - **Salt**: 32 random bytes fed to PBKDF2.
//! - **HMAC**: 64 lowercase hex chars, HMAC-SHA256 over the ciphertext only.
//! - **Ciphertext**: AES-256-CTR output of the padded plaintext.

use crate::consts::{LINE_WIDTH, MAC_HEX_LEN, VAULT_HEADER};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// VaultFrame
// ---------------------------------------------------------------------------

/// One decoded vault envelope. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFrame {
    header: String,
    salt: Vec<u8>,
    mac: String,
    ciphertext: Vec<u8>,
}

impl VaultFrame {
    /// Assemble a frame for writing; the header is always the 1.1 literal.
    pub fn new(salt: Vec<u8>, mac: String, ciphertext: Vec<u8>) -> Self {
        Self {
            header: VAULT_HEADER.to_string(),
            salt,
            mac,
            ciphertext,
        }
    }

    /// Decode raw file bytes into a frame.
    ///
    /// Fails with `MalformedFrame` when the body is not hex or does not
    /// split into salt, HMAC and ciphertext. A header other than the vault
    /// literal is *not* an error here; check `is_encrypted_format`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (header, body) = split_envelope(data);
        Self::from_parts(header, &body)
    }

    /// Decode a header line and an already-joined hex body.
    pub fn from_parts(header: String, body: &[u8]) -> Result<Self> {
        let decoded = hex::decode(body)
            .map_err(|e| VaultError::MalformedFrame(format!("body is not hex: {e}")))?;

        // Only the first two newlines are delimiters; the ciphertext hex
        // segment takes whatever remains.
        let mut parts = decoded.splitn(3, |&b| b == b'\n');
        let (Some(salt_hex), Some(mac), Some(ciphertext_hex)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(VaultError::MalformedFrame(
                "expected salt, hmac and ciphertext segments".into(),
            ));
        };

        let salt = hex::decode(salt_hex)
            .map_err(|e| VaultError::MalformedFrame(format!("salt is not hex: {e}")))?;
        let mac = String::from_utf8(mac.to_vec())
            .map_err(|_| VaultError::MalformedFrame("hmac is not text".into()))?;
        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| VaultError::MalformedFrame(format!("ciphertext is not hex: {e}")))?;

        tracing::debug!(
            salt_len = salt.len(),
            ciphertext_len = ciphertext.len(),
            "vault frame decoded"
        );

        Ok(Self {
            header,
            salt,
            mac,
            ciphertext,
        })
    }

    /// Report whether `data` is a well-formed vault envelope.
    ///
    /// Never fails: anything that is not vault-framed is simply `false`.
    /// The cipher and KDF are not touched.
    pub fn sniff(data: &[u8]) -> bool {
        let (header, body) = split_envelope(data);
        if header != VAULT_HEADER {
            return false;
        }
        Self::from_parts(header, &body)
            .map(|frame| frame.is_encrypted_format())
            .unwrap_or(false)
    }

    /// Header matches the vault literal and the HMAC has SHA-256 length.
    pub fn is_encrypted_format(&self) -> bool {
        self.header == VAULT_HEADER && self.mac.len() == MAC_HEX_LEN
    }

    /// Serialize to the on-disk text form, ending with a newline.
    pub fn encode(&self) -> String {
        let mut inner = Vec::with_capacity(
            2 * self.salt.len() + self.mac.len() + 2 * self.ciphertext.len() + 2,
        );
        inner.extend_from_slice(hex::encode(&self.salt).as_bytes());
        inner.push(b'\n');
        inner.extend_from_slice(self.mac.as_bytes());
        inner.push(b'\n');
        inner.extend_from_slice(hex::encode(&self.ciphertext).as_bytes());

        let body = hex::encode(inner);
        let mut out = String::with_capacity(
            self.header.len() + body.len() + body.len() / LINE_WIDTH + 2,
        );
        out.push_str(&self.header);
        out.push('\n');

        // The body is pure ASCII hex, so byte offsets are char boundaries.
        let mut start = 0;
        while start < body.len() {
            let end = (start + LINE_WIDTH).min(body.len());
            out.push_str(&body[start..end]);
            out.push('\n');
            start = end;
        }
        out
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

/// Split an envelope into its header line and the joined body lines.
///
/// Line terminators (`\n`, `\r\n`, lone `\r`) and surrounding blanks are
/// removed from each body line before joining.
pub fn split_envelope(data: &[u8]) -> (String, Vec<u8>) {
    let is_eol = |b: &u8| *b == b'\n' || *b == b'\r';
    let header_end = data.iter().position(is_eol).unwrap_or(data.len());
    let header = String::from_utf8_lossy(&data[..header_end]).into_owned();

    let mut body = Vec::with_capacity(data.len() - header_end);
    for line in data[header_end..].split(is_eol) {
        body.extend_from_slice(line.trim_ascii());
    }
    (header, body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

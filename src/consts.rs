//! Format and algorithm parameters shared by the file codec and the
//! document walker.
//!
//! These values are dictated by the Ansible vault 1.1 format. Changing any
//! of them makes the output unreadable by every other implementation.

/// First line of every vault-framed file or string.
pub const VAULT_HEADER: &str = "$ANSIBLE_VAULT;1.1;AES256";

/// YAML tag marking a scalar whose text is a vault frame.
pub const VAULT_TAG: &str = "!vault";

/// Length of the AES-256 key and of the HMAC key, in bytes.
pub const KEY_LEN: usize = 32;

/// AES block length, which is also the CTR initial counter length.
pub const IV_LEN: usize = 16;

/// Padding block size for PKCS#7-style padding.
pub const BLOCK_SIZE: usize = IV_LEN;

/// Length of the random salt generated for every encryption.
pub const SALT_LEN: usize = 32;

/// PBKDF2-HMAC-SHA256 rounds. Fixed by the format.
pub const KDF_ITERATIONS: u32 = 10_000;

/// Bytes produced by the KDF: cipher key, HMAC key, IV.
pub const KDF_OUTPUT_LEN: usize = 2 * KEY_LEN + IV_LEN;

/// A SHA-256 HMAC rendered as lowercase hex.
pub const MAC_HEX_LEN: usize = 64;

/// Column at which the hex body of a vault file is wrapped.
pub const LINE_WIDTH: usize = 80;

/// Upper bound on values materialized from one document, alias copies
/// included.
pub const MAX_DOCUMENT_NODES: usize = 1_000_000;

use thiserror::Error;

/// All errors that can occur while reading, writing, or decrypting vault data.
///
/// Messages only ever name the check that failed (and sometimes a path or
/// tag); passwords and plaintext never appear here.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Unable to derive keys, no salt available")]
    MissingSalt,

    #[error("HMAC encoded in the vault does not match the calculated one; wrong password or tampered data")]
    HmacMismatch,

    #[error("Cipher setup failed: {0}")]
    CipherError(String),

    // --- Credential errors ---
    #[error("A non-blank password is required")]
    BlankPassword,

    #[error("Conflicting password sources: supply either a password or a password file, not both")]
    ConflictingCredentialSources,

    // --- Frame errors ---
    #[error("Malformed vault frame: {0}")]
    MalformedFrame(String),

    #[error("Decrypted {0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    // --- Document errors ---
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Tried to load unspecified class: {0}")]
    DisallowedType(String),

    #[error("Tried to load unspecified symbol: {0}")]
    DisallowedSymbol(String),

    #[error("Alias parsing was not enabled; use the aliases option to allow back-references")]
    DisallowedAlias,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;

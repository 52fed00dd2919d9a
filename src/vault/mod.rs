//! Vault module: the Ansible vault 1.1 container.
//!
//! This module provides:
//! - The text envelope `VaultFrame` (`format`)
//! - `Encryptor` / `Decryptor` over a frame (`codec`)
//! - Password / password-file resolution (`credentials`)
//! - File-level read, write, rekey and detection (`file`)
//! - Stand-alone vault strings such as `!vault` scalars (`text`)

pub mod codec;
pub mod credentials;
pub mod file;
pub mod format;
pub mod text;

// Re-export the most commonly used items.
pub use codec::{decrypt, encrypt, Decryptor, Encryptor};
pub use credentials::{Credential, VaultOptions};
pub use file::{is_vault_encrypted, read, write, VaultFile};
pub use format::VaultFrame;
pub use text::{decrypt_text, encrypt_text, format_vault_scalar};

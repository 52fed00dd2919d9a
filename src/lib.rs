//! Ansible-vault compatible encryption: whole files, stand-alone vault
//! strings, and `!vault`-tagged values inside YAML documents.

pub mod cli;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod document;
pub mod errors;
pub mod vault;

pub use document::{decrypt_document, DocumentDecryptor, Value, ValueClass, WhitelistPolicy};
pub use errors::{Result, VaultError};
pub use vault::{decrypt_text, is_vault_encrypted, read, write, Credential, VaultOptions};

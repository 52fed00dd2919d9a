//! `avault is-encrypted`: report whether a file is vault-encrypted.

use std::path::Path;

use crate::errors::Result;
use crate::vault::is_vault_encrypted;

/// Execute the `is-encrypted` command. Prints `true` or `false` and returns
/// the answer so the caller can set the exit status.
pub fn execute(file: &Path) -> Result<bool> {
    let encrypted = is_vault_encrypted(file)?;
    println!("{encrypted}");
    Ok(encrypted)
}

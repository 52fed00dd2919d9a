//! `avault rekey`: re-encrypt a vault file under a new password.
//!
//! Decrypts with the current password, then writes a fresh frame with a
//! new random salt derived from the new password.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{credential, load_settings, new_credential, vault_options, Cli};
use crate::errors::Result;
use crate::vault::VaultFile;

/// Execute the `rekey` command.
pub fn execute(cli: &Cli, file: &Path, new_password_file: Option<&PathBuf>) -> Result<()> {
    let settings = load_settings()?;
    let options = vault_options(cli, &settings);

    let old = credential(cli, &settings)?;
    let new = new_credential(new_password_file)?;

    VaultFile::new(file).rekey(&old, &new, &options)?;

    output::success(&format!("Rekeyed {}", file.display()));
    Ok(())
}

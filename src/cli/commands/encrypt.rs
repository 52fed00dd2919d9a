//! `avault encrypt`: encrypt a plaintext file.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{credential, load_settings, vault_options, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{self, VaultFile};

/// Execute the `encrypt` command.
pub fn execute(cli: &Cli, file: &Path, out: Option<&Path>) -> Result<()> {
    let source = VaultFile::new(file);
    if source.is_encrypted()? {
        return Err(VaultError::CommandFailed(format!(
            "{} is already vault-encrypted",
            file.display()
        )));
    }

    let settings = load_settings()?;
    let options = vault_options(cli, &settings);
    let cred = credential(cli, &settings)?;

    let plaintext = Zeroizing::new(fs::read(file)?);
    let target = out.unwrap_or(file);
    vault::write(target, &cred, &plaintext, &options)?;

    output::success(&format!("Encrypted {}", target.display()));
    Ok(())
}

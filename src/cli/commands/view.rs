//! `avault view`: print a vault file's plaintext to stdout.

use std::io::{self, Write};
use std::path::Path;

use crate::cli::{credential, load_settings, vault_options, Cli};
use crate::errors::Result;
use crate::vault::VaultFile;

/// Execute the `view` command.
pub fn execute(cli: &Cli, file: &Path) -> Result<()> {
    let settings = load_settings()?;
    let options = vault_options(cli, &settings);
    let cred = credential(cli, &settings)?;

    let plaintext = VaultFile::new(file).view(&cred, &options)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&plaintext)?;
    stdout.flush()?;
    Ok(())
}

//! `avault decrypt`: replace a vault file with its plaintext.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::cli::output;
use crate::cli::{credential, load_settings, vault_options, Cli};
use crate::errors::Result;
use crate::vault::VaultFile;

/// Execute the `decrypt` command.
pub fn execute(cli: &Cli, file: &Path, out: Option<&Path>) -> Result<()> {
    let settings = load_settings()?;
    let options = vault_options(cli, &settings);
    let cred = credential(cli, &settings)?;

    // `view` refuses files that are not encrypted.
    let plaintext = VaultFile::new(file).view(&cred, &options)?;

    let target = out.unwrap_or(file);
    let mut handle = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)?;
    handle.write_all(&plaintext)?;

    output::success(&format!("Decrypted {}", target.display()));
    if out.is_none() {
        output::warning(&format!("{} now holds plaintext", target.display()));
    }
    Ok(())
}

//! `avault encrypt-string`: encrypt one value for pasting into YAML.
//!
//! Usage:
//!   avault encrypt-string 'hunter2' --name db_password >> vars.yml

use crate::cli::{credential, load_settings, vault_options, Cli};
use crate::errors::Result;
use crate::vault::{encrypt_text, format_vault_scalar};

/// Execute the `encrypt-string` command.
pub fn execute(cli: &Cli, value: &str, name: Option<&str>) -> Result<()> {
    let settings = load_settings()?;
    let options = vault_options(cli, &settings);
    let password = credential(cli, &settings)?.resolve(&options)?;

    let vault_text = encrypt_text(value, &password)?;
    print!("{}", format_vault_scalar(name, &vault_text));
    Ok(())
}

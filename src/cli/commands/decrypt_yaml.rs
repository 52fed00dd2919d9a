//! `avault decrypt-yaml`: decrypt the `!vault` values of a YAML file.
//!
//! The file itself may also be vault-encrypted as a whole. The decrypted
//! document is printed as pretty JSON.

use std::path::Path;

use crate::cli::{credential, load_settings, vault_options, Cli};
use crate::document::{DocumentDecryptor, Value, ValueClass, WhitelistPolicy};
use crate::errors::{Result, VaultError};
use crate::vault::VaultFile;

/// Flags that widen the configured whitelist.
#[derive(Debug, Default)]
pub struct PolicyFlags<'a> {
    pub aliases: bool,
    pub allow_classes: &'a [String],
    pub allow_symbols: &'a [String],
}

/// Execute the `decrypt-yaml` command.
pub fn execute(cli: &Cli, file: &Path, flags: PolicyFlags<'_>) -> Result<()> {
    let settings = load_settings()?;
    let options = vault_options(cli, &settings);
    let password = credential(cli, &settings)?.resolve(&options)?;
    let policy = widen(settings.whitelist_policy(), &flags);

    let value = decrypt_file(file, &password, policy)?;
    let json = serde_json::to_string_pretty(&value.to_json())
        .map_err(|e| VaultError::CommandFailed(format!("JSON output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Read `file` (whole-file vault or plain) and decrypt its `!vault` values.
fn decrypt_file(file: &Path, password: &str, policy: WhitelistPolicy) -> Result<Value> {
    let raw = VaultFile::new(file).read_with_password(password)?;
    let text = std::str::from_utf8(&raw).map_err(|_| VaultError::InvalidUtf8("YAML document"))?;
    DocumentDecryptor::new(password, policy).decrypt(text)
}

/// Layer command-line flags over the policy from `.avault.toml`.
fn widen(policy: WhitelistPolicy, flags: &PolicyFlags<'_>) -> WhitelistPolicy {
    let aliases = policy.aliases_enabled() || flags.aliases;
    let policy = flags
        .allow_classes
        .iter()
        .filter_map(|name| name.parse::<ValueClass>().ok())
        .fold(policy, WhitelistPolicy::allow_class);
    flags
        .allow_symbols
        .iter()
        .fold(policy, |policy, name| policy.allow_symbol(name.as_str()))
        .with_aliases(aliases)
}

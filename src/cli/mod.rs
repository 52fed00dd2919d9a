//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{Credential, VaultOptions};

/// Environment variable holding the vault password (CI/CD).
pub const PASSWORD_ENV: &str = "AVAULT_PASSWORD";

/// Environment variable holding the new password for `rekey`.
pub const NEW_PASSWORD_ENV: &str = "AVAULT_NEW_PASSWORD";

/// avault CLI: Ansible-vault compatible file and YAML encryption.
#[derive(Parser)]
#[command(
    name = "avault",
    about = "Ansible-vault compatible encryption for files and YAML values",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// File containing the vault password
    #[arg(long, global = true)]
    pub vault_password_file: Option<PathBuf>,

    /// Accept an empty vault password
    #[arg(long, global = true)]
    pub allow_blank_password: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a plaintext file
    Encrypt {
        /// File to encrypt
        file: PathBuf,
        /// Write the vault here instead of replacing the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decrypt a vault file
    Decrypt {
        /// Vault file to decrypt
        file: PathBuf,
        /// Write the plaintext here instead of replacing the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the decrypted contents of a vault file
    View {
        /// Vault file to show
        file: PathBuf,
    },

    /// Re-encrypt a vault file under a new password
    Rekey {
        /// Vault file to rekey
        file: PathBuf,
        /// File containing the new password (prompted for if omitted)
        #[arg(long)]
        new_vault_password_file: Option<PathBuf>,
    },

    /// Report whether a file is vault-encrypted (exit status 1 if not)
    IsEncrypted {
        /// File to check
        file: PathBuf,
    },

    /// Encrypt a single value as a `!vault` YAML scalar
    EncryptString {
        /// Value to encrypt
        value: String,
        /// Emit a `NAME: !vault |` mapping entry
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Decrypt the `!vault` values of a YAML file and print it as JSON
    DecryptYaml {
        /// YAML file (itself optionally vault-encrypted)
        file: PathBuf,
        /// Allow `*alias` references
        #[arg(long)]
        aliases: bool,
        /// Permit a non-primitive class (Symbol, Timestamp, Date, or a tag)
        #[arg(long = "allow-class")]
        allow_classes: Vec<String>,
        /// Permit a symbol name
        #[arg(long = "allow-symbol")]
        allow_symbols: Vec<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },

    /// Show version
    Version,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.avault.toml` from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Codec options: the command-line flag or the config file may allow blank passwords.
pub fn vault_options(cli: &Cli, settings: &Settings) -> VaultOptions {
    let mut options = settings.options();
    options.allow_blank_password |= cli.allow_blank_password;
    options
}

/// Work out where the vault password comes from, in order:
/// 1. `--vault-password-file`
/// 2. `AVAULT_PASSWORD` env var (CI/CD)
/// 3. `password_file` in `.avault.toml`
/// 4. Interactive prompt
///
/// Passing both 1 and 2 is a conflict and is left for `Credential::resolve`
/// to reject.
pub fn credential(cli: &Cli, settings: &Settings) -> Result<Credential> {
    let env_password = password_from_env(PASSWORD_ENV);

    if let Some(path) = &cli.vault_password_file {
        return Ok(Credential::from_sources(env_password, Some(path.clone())));
    }
    if let Some(pw) = env_password {
        return Ok(Credential::from_sources(Some(pw), None));
    }
    if let Some(path) = &settings.password_file {
        return Ok(Credential::password_file(path.clone()));
    }

    let pw = prompt_password("Vault password")?;
    Ok(Credential::from_sources(Some(pw), None))
}

/// The credential for the new password of a `rekey`.
///
/// Uses the given file, then `AVAULT_NEW_PASSWORD`, then a confirmed prompt.
pub fn new_credential(password_file: Option<&PathBuf>) -> Result<Credential> {
    if let Some(path) = password_file {
        return Ok(Credential::password_file(path.clone()));
    }
    if let Some(pw) = password_from_env(NEW_PASSWORD_ENV) {
        return Ok(Credential::from_sources(Some(pw), None));
    }

    let password = dialoguer::Password::new()
        .with_prompt("New vault password")
        .with_confirmation("Confirm new vault password", "Passwords do not match, try again")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Credential::from_sources(Some(Zeroizing::new(password)), None))
}

/// Read a non-empty password from an environment variable.
fn password_from_env(var: &str) -> Option<Zeroizing<String>> {
    std::env::var(var)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Prompt for a password on the terminal.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

//! Resolving the vault password from an inline value or a password file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Behavior switches shared by every vault operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultOptions {
    /// Accept a missing or whitespace-only password and use `""` instead.
    pub allow_blank_password: bool,
}

/// Where the password comes from. At most one source may be set.
#[derive(Default)]
pub struct Credential {
    password: Option<Zeroizing<String>>,
    password_file: Option<PathBuf>,
}

impl Credential {
    /// An inline password.
    pub fn password(password: impl Into<String>) -> Self {
        Self {
            password: Some(Zeroizing::new(password.into())),
            password_file: None,
        }
    }

    /// A file whose contents (minus trailing whitespace) are the password.
    pub fn password_file(path: impl Into<PathBuf>) -> Self {
        Self {
            password: None,
            password_file: Some(path.into()),
        }
    }

    /// Build from both optional sources, as a CLI or config layer would.
    pub fn from_sources(password: Option<Zeroizing<String>>, password_file: Option<PathBuf>) -> Self {
        Self {
            password,
            password_file,
        }
    }

    /// The password file this credential reads, if any.
    pub fn source_file(&self) -> Option<&Path> {
        self.password_file.as_deref()
    }

    /// Produce the final password.
    ///
    /// - Both sources set → `ConflictingCredentialSources`.
    /// - A password file is read whole and trailing whitespace trimmed.
    /// - A missing or blank result → `BlankPassword`, unless
    ///   `allow_blank_password` is set, in which case `""` is used.
    pub fn resolve(&self, options: &VaultOptions) -> Result<Zeroizing<String>> {
        let resolved = match (&self.password, &self.password_file) {
            (Some(_), Some(_)) => return Err(VaultError::ConflictingCredentialSources),
            (Some(pw), None) => Some(pw.clone()),
            (None, Some(path)) => Some(read_password_file(path)?),
            (None, None) => None,
        };

        match resolved {
            Some(pw) if !pw.trim().is_empty() => Ok(pw),
            _ if options.allow_blank_password => Ok(Zeroizing::new(String::new())),
            _ => Err(VaultError::BlankPassword),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("password_file", &self.password_file)
            .finish()
    }
}

/// Read a password file and drop trailing whitespace (usually a newline).
fn read_password_file(path: &Path) -> Result<Zeroizing<String>> {
    let raw = Zeroizing::new(fs::read(path)?);
    let text = std::str::from_utf8(&raw).map_err(|_| VaultError::InvalidUtf8("password file"))?;
    Ok(Zeroizing::new(text.trim_end().to_string()))
}

//! Reading and writing vault files on disk.
//!
//! `VaultFile` resolves the credential, sniffs whether the file is
//! vault-framed, and dispatches to the codec. Non-vault files read back
//! as their raw bytes.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::codec::{Decryptor, Encryptor};
use super::credentials::{Credential, VaultOptions};
use super::format::{split_envelope, VaultFrame};
use crate::consts::VAULT_HEADER;
use crate::errors::{Result, VaultError};

/// A handle on one vault file path.
#[derive(Debug, Clone)]
pub struct VaultFile {
    path: PathBuf,
}

impl VaultFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Report whether the file is vault-encrypted.
    ///
    /// Only the header and HMAC segment are inspected. Non-vault content
    /// is `Ok(false)`; only I/O failures are errors.
    pub fn is_encrypted(&self) -> Result<bool> {
        let data = Zeroizing::new(fs::read(&self.path)?);
        Ok(VaultFrame::sniff(&data))
    }

    /// Read the file, decrypting it when it is vault-framed.
    ///
    /// A file that is not in the encrypted format is returned byte for
    /// byte. The returned buffer is wiped on drop.
    pub fn read(&self, credential: &Credential, options: &VaultOptions) -> Result<Zeroizing<Vec<u8>>> {
        let password = credential.resolve(options)?;
        self.read_with_password(&password)
    }

    /// `read` with a password the caller has already resolved.
    pub fn read_with_password(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        let data = Zeroizing::new(fs::read(&self.path)?);

        let Some(frame) = self.decode(&data)? else {
            tracing::debug!(path = %self.path.display(), "not vault-framed, returning raw bytes");
            return Ok(data);
        };

        let plaintext = Decryptor::for_frame(&frame, password.as_bytes())?.decrypt(&frame)?;
        tracing::debug!(path = %self.path.display(), "decrypted vault file");
        Ok(plaintext)
    }

    /// Like `read`, but the file must actually be encrypted.
    pub fn view(&self, credential: &Credential, options: &VaultOptions) -> Result<Zeroizing<Vec<u8>>> {
        if !self.is_encrypted()? {
            return Err(VaultError::MalformedFrame(format!(
                "{} is not a vault file",
                self.path.display()
            )));
        }
        self.read(credential, options)
    }

    /// Encrypt `plaintext` and replace the file's contents with the frame.
    ///
    /// The file is created if missing and truncated otherwise; its handle
    /// is closed before this returns, on success and on error.
    pub fn write(&self, credential: &Credential, plaintext: &[u8], options: &VaultOptions) -> Result<()> {
        let password = credential.resolve(options)?;
        let frame = Encryptor::new(password.as_bytes())?.encrypt(plaintext)?;
        self.write_frame(&frame)
    }

    /// Decrypt with `old`, then re-encrypt under `new` with a fresh salt.
    pub fn rekey(&self, old: &Credential, new: &Credential, options: &VaultOptions) -> Result<()> {
        // Resolve the new password first so a bad source fails before any work.
        let new_password = new.resolve(options)?;
        let plaintext = self.view(old, options)?;

        let frame = Encryptor::new(new_password.as_bytes())?.encrypt(&plaintext)?;
        self.write_frame(&frame)?;
        tracing::debug!(path = %self.path.display(), "rekeyed vault file");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// `Some(frame)` when `data` is in the encrypted format.
    fn decode(&self, data: &[u8]) -> Result<Option<VaultFrame>> {
        let (header, body) = split_envelope(data);
        if header != VAULT_HEADER {
            return Ok(None);
        }
        let frame = VaultFrame::from_parts(header, &body).map_err(|e| match e {
            VaultError::MalformedFrame(msg) => {
                VaultError::MalformedFrame(format!("{}: {msg}", self.path.display()))
            }
            other => other,
        })?;
        Ok(frame.is_encrypted_format().then_some(frame))
    }

    fn write_frame(&self, frame: &VaultFrame) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(frame.encode().as_bytes())?;
        file.sync_all()?;
        tracing::debug!(path = %self.path.display(), "wrote vault file");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Free-function API
// ---------------------------------------------------------------------------

/// Read `path`, decrypting it if it is a vault file.
pub fn read(path: &Path, credential: &Credential, options: &VaultOptions) -> Result<Zeroizing<Vec<u8>>> {
    VaultFile::new(path).read(credential, options)
}

/// Encrypt `plaintext` into `path`.
pub fn write(path: &Path, credential: &Credential, plaintext: &[u8], options: &VaultOptions) -> Result<()> {
    VaultFile::new(path).write(credential, plaintext, options)
}

/// Report whether `path` holds a vault-encrypted file.
pub fn is_vault_encrypted(path: &Path) -> Result<bool> {
    VaultFile::new(path).is_encrypted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn opts() -> VaultOptions {
        VaultOptions::default()
    }

    #[test]
    fn write_then_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let vf = VaultFile::new(tmp.path().join("secrets.yml"));
        let cred = Credential::password("ansible");

        vf.write(&cred, b"db_password: hunter2\n", &opts()).unwrap();
        assert!(vf.is_encrypted().unwrap());

        let plaintext = vf.read(&cred, &opts()).unwrap();
        assert_eq!(plaintext.as_slice(), b"db_password: hunter2\n");
    }

    #[test]
    fn read_with_resolved_password() {
        let tmp = TempDir::new().unwrap();
        let vf = VaultFile::new(tmp.path().join("secrets.yml"));
        vf.write(&Credential::password("ansible"), b"token: abc\n", &opts()).unwrap();

        assert_eq!(vf.read_with_password("ansible").unwrap().as_slice(), b"token: abc\n");
        assert!(matches!(vf.read_with_password("nope"), Err(VaultError::HmacMismatch)));
    }

    #[test]
    fn plain_file_reads_back_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.yml");
        fs::write(&path, "key: value\n").unwrap();

        let data = read(&path, &Credential::password("ansible"), &opts()).unwrap();
        assert_eq!(data.as_slice(), b"key: value\n");
        assert!(!is_vault_encrypted(&path).unwrap());
    }

    #[test]
    fn write_truncates_longer_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("v.yml");
        fs::write(&path, "x".repeat(10_000)).unwrap();

        write(&path, &Credential::password("pw"), b"short", &opts()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(VAULT_HEADER));
        assert!(!text.contains('x'));
    }

    #[test]
    fn view_rejects_plain_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.txt");
        fs::write(&path, "hello").unwrap();

        let err = VaultFile::new(&path)
            .view(&Credential::password("pw"), &opts())
            .unwrap_err();
        assert!(matches!(err, VaultError::MalformedFrame(_)));
    }

    #[test]
    fn rekey_changes_password() {
        let tmp = TempDir::new().unwrap();
        let vf = VaultFile::new(tmp.path().join("v.yml"));
        let old = Credential::password("old-pw");
        let new = Credential::password("new-pw");

        vf.write(&old, b"payload", &opts()).unwrap();
        vf.rekey(&old, &new, &opts()).unwrap();

        assert!(matches!(vf.read(&old, &opts()), Err(VaultError::HmacMismatch)));
        assert_eq!(vf.read(&new, &opts()).unwrap().as_slice(), b"payload");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = is_vault_encrypted(Path::new("/no/such/vault.yml")).unwrap_err();
        assert!(matches!(err, VaultError::Io(_)));
    }
}

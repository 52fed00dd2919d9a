//! Integration tests for the avault vault module.

use std::fs;
use std::path::PathBuf;

use avault::consts::VAULT_HEADER;
use avault::vault::{self, decrypt_text, Credential, Encryptor, VaultFile, VaultFrame, VaultOptions};
use avault::VaultError;
use tempfile::TempDir;

const EMPTY_YML: &str = include_str!("fixtures/empty.yml");
const SEKRET_VAULT: &str = include_str!("fixtures/sekret.txt.vault");
const SEKRET: &str = "this is my sekret, there are many like it, but this one is mine\n";

/// Helper: a fresh temp dir and a path inside it.
fn temp_path(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(name);
    (dir, path)
}

fn opts() -> VaultOptions {
    VaultOptions::default()
}

// ---------------------------------------------------------------------------
// Known-answer fixtures from ansible-vault
// ---------------------------------------------------------------------------

#[test]
fn decrypts_reference_vault_text() {
    assert_eq!(decrypt_text(EMPTY_YML, "ansible").unwrap().as_str(), "---\n");
}

#[test]
fn reproduces_reference_frame_from_its_salt() {
    let frame = VaultFrame::parse(EMPTY_YML.as_bytes()).unwrap();
    let salt: [u8; 32] = frame.salt().try_into().unwrap();

    let again = Encryptor::with_salt(b"ansible", salt).unwrap().encrypt(b"---\n").unwrap();
    assert_eq!(again.encode(), EMPTY_YML);
}

#[test]
fn reads_reference_vault_file() {
    let (_dir, path) = temp_path("sekret.txt");
    fs::write(&path, SEKRET_VAULT).unwrap();

    let plaintext = vault::read(&path, &Credential::password("ansible"), &opts()).unwrap();
    assert!(std::str::from_utf8(&plaintext).unwrap().starts_with("this is my sekret"));
}

// ---------------------------------------------------------------------------
// Write / read round-trip
// ---------------------------------------------------------------------------

#[test]
fn write_then_read_with_password_file() {
    let (dir, path) = temp_path("sekret.txt");
    let pw_file = dir.path().join("pw");
    fs::write(&pw_file, "ansible\n").unwrap();
    let cred = Credential::password_file(&pw_file);

    vault::write(&path, &cred, SEKRET.as_bytes(), &opts()).unwrap();

    let on_disk = fs::read_to_string(&path).unwrap();
    assert!(on_disk.starts_with(VAULT_HEADER));
    assert!(on_disk.lines().skip(1).all(|l| l.len() <= 80));
    assert!(vault::is_vault_encrypted(&path).unwrap());

    let back = vault::read(&path, &Credential::password("ansible"), &opts()).unwrap();
    assert_eq!(back.as_slice(), SEKRET.as_bytes());
}

#[test]
fn each_write_uses_a_fresh_salt() {
    let (_dir, path) = temp_path("v.yml");
    let cred = Credential::password("ansible");

    vault::write(&path, &cred, b"same", &opts()).unwrap();
    let first = fs::read_to_string(&path).unwrap();
    vault::write(&path, &cred, b"same", &opts()).unwrap();
    let second = fs::read_to_string(&path).unwrap();

    assert_ne!(first, second);
}

#[test]
fn empty_plaintext_roundtrips() {
    let (_dir, path) = temp_path("empty.yml");
    let cred = Credential::password("ansible");

    vault::write(&path, &cred, b"", &opts()).unwrap();
    assert!(vault::read(&path, &cred, &opts()).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_is_hmac_mismatch() {
    let (_dir, path) = temp_path("sekret.txt");
    fs::write(&path, SEKRET_VAULT).unwrap();

    let err = vault::read(&path, &Credential::password("nope"), &opts()).unwrap_err();
    assert!(matches!(err, VaultError::HmacMismatch));
}

#[test]
fn tampered_ciphertext_is_hmac_mismatch() {
    let frame = VaultFrame::parse(EMPTY_YML.as_bytes()).unwrap();
    let mut ciphertext = frame.ciphertext().to_vec();
    ciphertext[0] ^= 0xff;
    let tampered = VaultFrame::new(frame.salt().to_vec(), frame.mac().to_string(), ciphertext);

    assert!(matches!(
        decrypt_text(&tampered.encode(), "ansible"),
        Err(VaultError::HmacMismatch)
    ));
}

#[test]
fn blank_password_rejected_unless_allowed() {
    let (_dir, path) = temp_path("v.yml");
    let blank = Credential::password("");

    assert!(matches!(
        vault::write(&path, &blank, b"x", &opts()),
        Err(VaultError::BlankPassword)
    ));

    let allow = VaultOptions {
        allow_blank_password: true,
    };
    vault::write(&path, &blank, b"x", &allow).unwrap();
    assert_eq!(vault::read(&path, &blank, &allow).unwrap().as_slice(), b"x");
}

#[test]
fn conflicting_sources_rejected_before_io() {
    let cred = Credential::from_sources(
        Some(zeroize::Zeroizing::new("pw".to_string())),
        Some(PathBuf::from("/no/such/file")),
    );
    let err = vault::read(std::path::Path::new("/no/such/vault"), &cred, &opts()).unwrap_err();
    assert!(matches!(err, VaultError::ConflictingCredentialSources));
}

#[test]
fn non_vault_file_reads_back_raw() {
    let (_dir, path) = temp_path("plain.txt");
    fs::write(&path, SEKRET).unwrap();

    assert!(!vault::is_vault_encrypted(&path).unwrap());
    let raw = vault::read(&path, &Credential::password("ansible"), &opts()).unwrap();
    assert_eq!(raw.as_slice(), SEKRET.as_bytes());
}

#[test]
fn rekey_then_read_with_new_password() {
    let (_dir, path) = temp_path("sekret.txt");
    fs::write(&path, SEKRET_VAULT).unwrap();
    let vf = VaultFile::new(&path);

    vf.rekey(&Credential::password("ansible"), &Credential::password("rotated"), &opts())
        .unwrap();

    let text = vf.read(&Credential::password("rotated"), &opts()).unwrap();
    assert!(text.starts_with(b"this is my sekret"));
    assert_ne!(fs::read_to_string(&path).unwrap(), SEKRET_VAULT);
}

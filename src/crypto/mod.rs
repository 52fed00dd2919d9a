//! Cryptographic primitives for the vault format.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation (`kdf`)
//! - The zeroize-on-drop `DerivedKeySet` (`keys`)
//! - AES-256-CTR keystream application (`cipher`)
//! - PKCS#7-style padding (`padding`)
//! - HMAC-SHA256 computation and constant-time verification (`mac`)

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod mac;
pub mod padding;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_keys, Mode, ...};
pub use cipher::{CipherEngine, Mode};
pub use kdf::{derive_keys, generate_salt};
pub use keys::DerivedKeySet;
pub use mac::{compute_hmac, verify_hmac};
pub use padding::{pad, unpad};

//! Document module: selective decryption of `!vault` scalars in YAML.
//!
//! This module provides:
//! - A node tree built from the parser event stream (`node`)
//! - The per-scalar rewrite that decrypts `!vault` values (`hook`)
//! - Implicit and core-tag scalar typing (`resolve`)
//! - Policy-gated materialization into `Value` (`materialize`, `policy`)

pub mod hook;
mod materialize;
pub mod node;
pub mod policy;
pub mod resolve;
pub mod value;

use std::fmt;

use zeroize::Zeroizing;

use crate::errors::Result;
use materialize::Materializer;

pub use hook::{ScalarEvent, ScalarHook, VaultTagHook};
pub use node::{parse_document, Node};
pub use policy::{ValueClass, WhitelistPolicy};
pub use value::Value;

/// Decrypts the `!vault` scalars of YAML documents with one password and
/// one whitelist policy.
pub struct DocumentDecryptor {
    password: Zeroizing<String>,
    policy: WhitelistPolicy,
}

impl DocumentDecryptor {
    pub fn new(password: &str, policy: WhitelistPolicy) -> Self {
        Self {
            password: Zeroizing::new(password.to_string()),
            policy,
        }
    }

    pub fn policy(&self) -> &WhitelistPolicy {
        &self.policy
    }

    /// Decrypt and materialize the first document in `text`.
    ///
    /// An empty stream or a null document yields an empty mapping. Only
    /// the `!vault` scalars change; the document's shape is untouched.
    pub fn decrypt(&self, text: &str) -> Result<Value> {
        let mut hook = VaultTagHook::new(&self.password);
        let Some(root) = parse_document(text, &mut hook)? else {
            return Ok(Value::empty_mapping());
        };
        tracing::debug!(decrypted = hook.decrypted(), "document parsed");

        let value = Materializer::new(&self.policy).materialize(&root)?;
        Ok(match value {
            Value::Null => Value::empty_mapping(),
            other => other,
        })
    }
}

impl fmt::Debug for DocumentDecryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentDecryptor")
            .field("password", &"[REDACTED]")
            .field("policy", &self.policy)
            .finish()
    }
}

/// Decrypt every `!vault` scalar in `text` and materialize the result.
pub fn decrypt_document(text: &str, password: &str, policy: &WhitelistPolicy) -> Result<Value> {
    DocumentDecryptor::new(password, policy.clone()).decrypt(text)
}

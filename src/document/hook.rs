//! Per-scalar rewriting applied while the parse event stream is consumed.

use std::fmt;

use yaml_rust2::scanner::TScalarStyle;

use crate::consts::VAULT_TAG;
use crate::errors::Result;
use crate::vault::decrypt_text;

/// One scalar as it comes off the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarEvent {
    pub value: String,
    pub style: TScalarStyle,
    /// Full tag text, e.g. `!vault` or `!!str`.
    pub tag: Option<String>,
}

/// Sees every scalar before it reaches the document tree and returns the
/// scalar to use in its place.
pub trait ScalarHook {
    fn on_scalar(&mut self, scalar: ScalarEvent) -> Result<ScalarEvent>;
}

/// Decrypts `!vault` scalars in place.
///
/// The replacement is an untagged plain scalar, so the plaintext is typed
/// and whitelisted exactly as if it had been written in the clear.
pub struct VaultTagHook<'a> {
    password: &'a str,
    decrypted: usize,
}

impl<'a> VaultTagHook<'a> {
    pub fn new(password: &'a str) -> Self {
        Self { password, decrypted: 0 }
    }

    /// Number of `!vault` scalars replaced so far.
    pub fn decrypted(&self) -> usize {
        self.decrypted
    }
}

impl fmt::Debug for VaultTagHook<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultTagHook")
            .field("password", &"[REDACTED]")
            .field("decrypted", &self.decrypted)
            .finish()
    }
}

impl ScalarHook for VaultTagHook<'_> {
    fn on_scalar(&mut self, scalar: ScalarEvent) -> Result<ScalarEvent> {
        if scalar.tag.as_deref() != Some(VAULT_TAG) {
            return Ok(scalar);
        }

        let mut plaintext = decrypt_text(&scalar.value, self.password)?;
        self.decrypted += 1;
        Ok(ScalarEvent {
            value: std::mem::take(&mut *plaintext),
            style: TScalarStyle::Plain,
            tag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VaultError;
    use crate::vault::encrypt_text;

    fn event(value: &str, tag: Option<&str>) -> ScalarEvent {
        ScalarEvent {
            value: value.to_string(),
            style: TScalarStyle::Literal,
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn untagged_scalars_pass_through() {
        let mut hook = VaultTagHook::new("ansible");
        let input = event("plain", None);
        assert_eq!(hook.on_scalar(input.clone()).unwrap(), input);

        let other = event("x", Some("!custom"));
        assert_eq!(hook.on_scalar(other.clone()).unwrap(), other);
        assert_eq!(hook.decrypted(), 0);
    }

    #[test]
    fn vault_scalar_is_decrypted_untagged() {
        let vault_text = encrypt_text("42", "ansible").unwrap();
        let mut hook = VaultTagHook::new("ansible");

        let out = hook.on_scalar(event(&vault_text, Some("!vault"))).unwrap();
        assert_eq!(out.value, "42");
        assert_eq!(out.tag, None);
        assert_eq!(out.style, TScalarStyle::Plain);
        assert_eq!(hook.decrypted(), 1);
    }

    #[test]
    fn wrong_password_fails() {
        let vault_text = encrypt_text("secret", "right").unwrap();
        let mut hook = VaultTagHook::new("wrong");
        assert!(matches!(
            hook.on_scalar(event(&vault_text, Some("!vault"))),
            Err(VaultError::HmacMismatch)
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let hook = VaultTagHook::new("hunter2");
        assert!(!format!("{hook:?}").contains("hunter2"));
    }
}

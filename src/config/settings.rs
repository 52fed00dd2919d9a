use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{ValueClass, WhitelistPolicy};
use crate::errors::{Result, VaultError};
use crate::vault::VaultOptions;

/// Project-level configuration, loaded from `.avault.toml`.
///
/// Every field has a default, so avault works without any config file.
/// Command-line flags are layered on top by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File holding the vault password (trailing whitespace is trimmed).
    pub password_file: Option<PathBuf>,

    /// Accept an empty password instead of failing with `BlankPassword`.
    pub allow_blank_password: bool,

    /// Allow `*alias` references in decrypted documents.
    pub aliases: bool,

    /// Non-primitive value classes documents may contain (e.g. "Symbol").
    pub whitelist_classes: Vec<String>,

    /// Symbol names documents may contain, without the leading `:`.
    pub whitelist_symbols: Vec<String>,
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".avault.toml";

    /// Load settings from `<project_dir>/.avault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let mut settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        // A relative password file is relative to the config file, not the cwd.
        if let Some(path) = settings.password_file.take() {
            settings.password_file = Some(project_dir.join(path));
        }

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Codec options derived from these settings.
    pub fn options(&self) -> VaultOptions {
        VaultOptions {
            allow_blank_password: self.allow_blank_password,
        }
    }

    /// Document whitelist derived from these settings.
    pub fn whitelist_policy(&self) -> WhitelistPolicy {
        let policy = self
            .whitelist_classes
            .iter()
            .filter_map(|name| name.parse::<ValueClass>().ok())
            .fold(WhitelistPolicy::new(), WhitelistPolicy::allow_class);

        self.whitelist_symbols
            .iter()
            .fold(policy, |policy, name| policy.allow_symbol(name.as_str()))
            .with_aliases(self.aliases)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_closed() {
        let s = Settings::default();
        assert_eq!(s.password_file, None);
        assert!(!s.allow_blank_password);
        assert!(!s.aliases);
        assert_eq!(s.whitelist_policy(), WhitelistPolicy::default());
        assert_eq!(s.options(), VaultOptions::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
password_file = "secrets/pw.txt"
allow_blank_password = true
aliases = true
whitelist_classes = ["Symbol", "Timestamp"]
whitelist_symbols = ["Simple"]
"#;
        fs::write(tmp.path().join(".avault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.password_file, Some(tmp.path().join("secrets/pw.txt")));
        assert!(settings.options().allow_blank_password);

        let policy = settings.whitelist_policy();
        assert!(policy.aliases_enabled());
        assert!(policy.allows_class(&ValueClass::Symbol));
        assert!(policy.allows_class(&ValueClass::Timestamp));
        assert!(policy.allows_symbol("Simple"));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".avault.toml"), "aliases = true\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert!(settings.aliases);
        assert!(!settings.allow_blank_password);
        assert!(settings.whitelist_classes.is_empty());
    }

    #[test]
    fn absolute_password_file_is_kept() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".avault.toml"),
            "password_file = \"/etc/avault/pw\"\n",
        )
        .unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.password_file, Some(PathBuf::from("/etc/avault/pw")));
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".avault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(VaultError::ConfigError(_))));
    }
}

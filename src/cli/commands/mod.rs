//! One module per subcommand, each exposing an `execute` function.

pub mod completions;
pub mod decrypt;
pub mod decrypt_yaml;
pub mod encrypt;
pub mod encrypt_string;
pub mod is_encrypted;
pub mod rekey;
pub mod version;
pub mod view;

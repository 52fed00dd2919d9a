//! Project configuration (`.avault.toml`).

pub mod settings;

pub use settings::Settings;

//! Which non-primitive values a document may materialize into.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A non-primitive value type that must be whitelisted before use.
///
/// Strings, numbers, booleans, null, binary, sequences and mappings are
/// always permitted and have no class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueClass {
    /// `:name` plain scalars.
    Symbol,
    /// Date-time scalars, implicit or `!!timestamp`.
    Timestamp,
    /// Bare `YYYY-MM-DD` scalars.
    Date,
    /// Any other explicit tag, named by the full tag (e.g. `!ruby/object:Foo`).
    Tag(String),
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol => f.write_str("Symbol"),
            Self::Timestamp => f.write_str("Timestamp"),
            Self::Date => f.write_str("Date"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

impl FromStr for ValueClass {
    type Err = std::convert::Infallible;

    /// Class names are case-insensitive; `Time` is accepted for timestamps.
    /// Anything unrecognized names a tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "symbol" => Self::Symbol,
            "timestamp" | "time" => Self::Timestamp,
            "date" => Self::Date,
            _ => Self::Tag(s.to_string()),
        })
    }
}

/// Gates applied while materializing a decrypted document.
///
/// The default policy allows nothing beyond primitives and rejects aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhitelistPolicy {
    allowed_classes: BTreeSet<ValueClass>,
    allowed_symbols: BTreeSet<String>,
    aliases_enabled: bool,
}

impl WhitelistPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit values of `class`.
    pub fn allow_class(mut self, class: ValueClass) -> Self {
        self.allowed_classes.insert(class);
        self
    }

    /// Permit the symbol `name` (without the leading `:`).
    ///
    /// Symbols also need `ValueClass::Symbol`; every symbol name must be
    /// listed, an empty list admits none.
    pub fn allow_symbol(mut self, name: impl Into<String>) -> Self {
        self.allowed_symbols.insert(name.into());
        self
    }

    /// Toggle alias (`*ref`) expansion.
    pub fn with_aliases(mut self, enabled: bool) -> Self {
        self.aliases_enabled = enabled;
        self
    }

    pub fn allows_class(&self, class: &ValueClass) -> bool {
        self.allowed_classes.contains(class)
    }

    pub fn allows_symbol(&self, name: &str) -> bool {
        self.allowed_symbols.contains(name)
    }

    pub fn aliases_enabled(&self) -> bool {
        self.aliases_enabled
    }
}

//! Native values produced by materializing a document.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::json;

/// A fully materialized YAML value.
///
/// Mappings keep their source order; keys may be any value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    Symbol(String),
    Timestamp(DateTime<FixedOffset>),
    Date(NaiveDate),
    Sequence(Vec<Value>),
    Mapping(Vec<(Value, Value)>),
    /// A scalar carrying a whitelisted custom tag, e.g. `!ruby/object:Foo`.
    Tagged { tag: String, value: Box<Value> },
}

impl Value {
    /// An empty mapping, returned for empty documents.
    pub fn empty_mapping() -> Self {
        Self::Mapping(Vec::new())
    }

    /// Look up a string key in a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| matches!(k, Self::String(s) if s == key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to JSON for display.
    ///
    /// Timestamps become RFC 3339 strings, dates ISO strings, binaries
    /// base64, and symbols keep their `:` prefix. Non-string mapping keys
    /// are rendered through their JSON text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => json!(b),
            Self::Int(i) => json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| json!(f.to_string())),
            Self::String(s) => json!(s),
            Self::Binary(bytes) => json!(BASE64.encode(bytes)),
            Self::Symbol(name) => json!(format!(":{name}")),
            Self::Timestamp(ts) => json!(ts.to_rfc3339()),
            Self::Date(date) => json!(date.to_string()),
            Self::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Mapping(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = match k {
                        Self::String(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    map.insert(key, v.to_json());
                }
                serde_json::Value::Object(map)
            }
            Self::Tagged { tag, value } => json!({ "tag": tag, "value": value.to_json() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_finds_string_keys() {
        let v = Value::Mapping(vec![
            (Value::String("key".into()), Value::String("value".into())),
            (Value::Int(1), Value::Bool(true)),
        ]);
        assert_eq!(v.get("key").and_then(Value::as_str), Some("value"));
        assert!(v.get("missing").is_none());
        assert!(Value::Null.get("key").is_none());
    }

    #[test]
    fn json_rendering() {
        let v = Value::Mapping(vec![
            (Value::String("n".into()), Value::Int(42)),
            (Value::String("s".into()), Value::Symbol("Simple".into())),
            (Value::String("l".into()), Value::Sequence(vec![Value::Null, Value::Bool(false)])),
            (Value::Int(7), Value::Float(1.5)),
        ]);
        assert_eq!(
            v.to_json(),
            json!({ "n": 42, "s": ":Simple", "l": [null, false], "7": 1.5 })
        );
    }

    #[test]
    fn non_finite_floats_render_as_strings() {
        assert_eq!(Value::Float(f64::INFINITY).to_json(), json!("inf"));
    }
}

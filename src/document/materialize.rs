//! Turns a node tree into `Value`s under a `WhitelistPolicy`.

use std::collections::HashMap;

use yaml_rust2::scanner::TScalarStyle;

use super::node::Node;
use super::policy::{ValueClass, WhitelistPolicy};
use super::resolve::{is_core_scalar_tag, resolve_core, resolve_plain};
use super::value::Value;
use crate::consts::MAX_DOCUMENT_NODES;
use crate::errors::{Result, VaultError};

const MERGE_KEY: &str = "<<";

pub(crate) struct Materializer<'p> {
    policy: &'p WhitelistPolicy,
    /// Anchored values with the number of nodes each one holds.
    anchors: HashMap<usize, (Value, usize)>,
    /// Nodes produced so far, counting every alias expansion in full.
    nodes: usize,
}

impl<'p> Materializer<'p> {
    pub(crate) fn new(policy: &'p WhitelistPolicy) -> Self {
        Self {
            policy,
            anchors: HashMap::new(),
            nodes: 0,
        }
    }

    pub(crate) fn materialize(&mut self, node: &Node) -> Result<Value> {
        let start = self.nodes;
        let (value, anchor) = match node {
            Node::Alias(id) => return self.alias(*id),
            Node::Scalar {
                value,
                style,
                tag,
                anchor,
            } => (self.scalar(value, *style, tag.as_deref())?, *anchor),
            Node::Sequence { items, tag, anchor } => (self.sequence(items, tag.as_deref())?, *anchor),
            Node::Mapping {
                entries,
                tag,
                anchor,
            } => (self.mapping(entries, tag.as_deref())?, *anchor),
        };

        self.charge(1)?;
        if anchor != 0 {
            self.anchors.insert(anchor, (value.clone(), self.nodes - start));
        }
        Ok(value)
    }

    fn alias(&mut self, id: usize) -> Result<Value> {
        if !self.policy.aliases_enabled() {
            return Err(VaultError::DisallowedAlias);
        }
        // An anchor is registered only once its node is complete, so a
        // self-referencing alias lands here too.
        let size = match self.anchors.get(&id) {
            Some((_, size)) => *size,
            None => return Err(VaultError::MalformedDocument("recursive or unknown alias".into())),
        };
        self.charge(size)?;
        Ok(self.anchors[&id].0.clone())
    }

    /// Count `nodes` more materialized values against the document budget.
    fn charge(&mut self, nodes: usize) -> Result<()> {
        self.nodes = self.nodes.saturating_add(nodes);
        if self.nodes > MAX_DOCUMENT_NODES {
            return Err(VaultError::MalformedDocument("alias expansion limit exceeded".into()));
        }
        Ok(())
    }

    fn scalar(&self, text: &str, style: TScalarStyle, tag: Option<&str>) -> Result<Value> {
        let value = match tag {
            None if style == TScalarStyle::Plain => resolve_plain(text),
            None => Value::String(text.to_string()),
            Some(tag) if is_core_scalar_tag(tag) => resolve_core(tag, text)?,
            Some(tag) => self.custom(tag, Value::String(text.to_string()))?,
        };
        self.check_class(&value)?;
        Ok(value)
    }

    fn sequence(&mut self, items: &[Node], tag: Option<&str>) -> Result<Value> {
        let values = items
            .iter()
            .map(|item| self.materialize(item))
            .collect::<Result<Vec<_>>>()?;
        let seq = Value::Sequence(values);
        match tag {
            None | Some("!!seq") => Ok(seq),
            Some(tag) if tag.starts_with("!!") => Err(mismatched_tag(tag, "sequence")),
            Some(tag) => self.custom(tag, seq),
        }
    }

    fn mapping(&mut self, entries: &[(Node, Node)], tag: Option<&str>) -> Result<Value> {
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(entries.len());

        for (key_node, value_node) in entries {
            if is_merge_key(key_node) {
                let merged = self.materialize(value_node)?;
                merge_into(&mut pairs, merged)?;
                continue;
            }
            let key = self.materialize(key_node)?;
            let value = self.materialize(value_node)?;
            // Duplicate keys: the last occurrence wins.
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }

        let map = Value::Mapping(pairs);
        match tag {
            None | Some("!!map") => Ok(map),
            Some(tag) if tag.starts_with("!!") => Err(mismatched_tag(tag, "mapping")),
            Some(tag) => self.custom(tag, map),
        }
    }

    /// Wrap `value` in a non-core tag, if the policy permits that tag.
    fn custom(&self, tag: &str, value: Value) -> Result<Value> {
        let class = ValueClass::Tag(tag.to_string());
        if !self.policy.allows_class(&class) {
            return Err(VaultError::DisallowedType(class.to_string()));
        }
        Ok(Value::Tagged {
            tag: tag.to_string(),
            value: Box::new(value),
        })
    }

    fn check_class(&self, value: &Value) -> Result<()> {
        let class = match value {
            Value::Symbol(_) => ValueClass::Symbol,
            Value::Timestamp(_) => ValueClass::Timestamp,
            Value::Date(_) => ValueClass::Date,
            _ => return Ok(()),
        };
        if !self.policy.allows_class(&class) {
            return Err(VaultError::DisallowedType(class.to_string()));
        }
        if let Value::Symbol(name) = value {
            if !self.policy.allows_symbol(name) {
                return Err(VaultError::DisallowedSymbol(name.clone()));
            }
        }
        Ok(())
    }
}

fn is_merge_key(node: &Node) -> bool {
    match node {
        Node::Scalar {
            value,
            style: TScalarStyle::Plain,
            tag: None,
            ..
        } => value == MERGE_KEY,
        Node::Scalar {
            tag: Some(tag), ..
        } => tag == "!!merge",
        _ => false,
    }
}

/// Add the entries of `source` (a mapping, or a sequence of mappings with
/// the earliest taking precedence) that are not already in `pairs`.
fn merge_into(pairs: &mut Vec<(Value, Value)>, source: Value) -> Result<()> {
    let sources = match source {
        Value::Mapping(entries) => vec![entries],
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Mapping(entries) => Ok(entries),
                _ => Err(VaultError::MalformedDocument("merge sequence must hold mappings".into())),
            })
            .collect::<Result<Vec<_>>>()?,
        _ => return Err(VaultError::MalformedDocument("merge value must be a mapping".into())),
    };

    for (key, value) in sources.into_iter().flatten() {
        if !pairs.iter().any(|(k, _)| *k == key) {
            pairs.push((key, value));
        }
    }
    Ok(())
}

fn mismatched_tag(tag: &str, kind: &str) -> VaultError {
    VaultError::MalformedDocument(format!("{tag} cannot tag a {kind}"))
}

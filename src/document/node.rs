//! Builds an untyped node tree from the parser's event stream.
//!
//! Every scalar goes through a `ScalarHook` on its way into the tree, so
//! `!vault` values are already plaintext by the time anything is typed.

use yaml_rust2::parser::{Event, EventReceiver, Parser, Tag};
use yaml_rust2::scanner::TScalarStyle;

use super::hook::{ScalarEvent, ScalarHook};
use crate::errors::{Result, VaultError};

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// A parsed, not yet typed, document node.
///
/// `anchor` is the parser's anchor id, 0 when the node has none.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar {
        value: String,
        style: TScalarStyle,
        tag: Option<String>,
        anchor: usize,
    },
    Sequence {
        items: Vec<Node>,
        tag: Option<String>,
        anchor: usize,
    },
    Mapping {
        entries: Vec<(Node, Node)>,
        tag: Option<String>,
        anchor: usize,
    },
    Alias(usize),
}

/// Parse the first document in `text`.
///
/// `Ok(None)` means the stream holds no document at all.
pub fn parse_document(text: &str, hook: &mut dyn ScalarHook) -> Result<Option<Node>> {
    let mut builder = TreeBuilder::new(hook);
    let loaded = Parser::new_from_str(text).load(&mut builder, false);

    if let Some(err) = builder.error.take() {
        return Err(err);
    }
    loaded.map_err(|e| VaultError::MalformedDocument(e.to_string()))?;
    Ok(builder.root)
}

/// Render a parser tag as written, with the core prefix shortened to `!!`.
fn tag_name(tag: &Tag) -> String {
    match tag.handle.as_str() {
        CORE_TAG_PREFIX => format!("!!{}", tag.suffix),
        handle => format!("{handle}{}", tag.suffix),
    }
}

enum Open {
    Sequence {
        items: Vec<Node>,
        tag: Option<String>,
        anchor: usize,
    },
    Mapping {
        entries: Vec<(Node, Node)>,
        key: Option<Node>,
        tag: Option<String>,
        anchor: usize,
    },
}

struct TreeBuilder<'h> {
    hook: &'h mut dyn ScalarHook,
    stack: Vec<Open>,
    root: Option<Node>,
    /// First hook failure; later events are ignored once set.
    error: Option<VaultError>,
}

impl<'h> TreeBuilder<'h> {
    fn new(hook: &'h mut dyn ScalarHook) -> Self {
        Self {
            hook,
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Open::Sequence { items, .. }) => items.push(node),
            Some(Open::Mapping { entries, key, .. }) => match key.take() {
                Some(k) => entries.push((k, node)),
                None => *key = Some(node),
            },
        }
    }

    fn scalar(&mut self, value: String, style: TScalarStyle, anchor: usize, tag: Option<Tag>) {
        let event = ScalarEvent {
            value,
            style,
            tag: tag.as_ref().map(tag_name),
        };
        match self.hook.on_scalar(event) {
            Ok(ScalarEvent { value, style, tag }) => self.push(Node::Scalar {
                value,
                style,
                tag,
                anchor,
            }),
            Err(err) => self.error = Some(err),
        }
    }

    fn close(&mut self) {
        let node = match self.stack.pop() {
            Some(Open::Sequence { items, tag, anchor }) => Node::Sequence { items, tag, anchor },
            Some(Open::Mapping {
                entries, tag, anchor, ..
            }) => Node::Mapping {
                entries,
                tag,
                anchor,
            },
            None => return,
        };
        self.push(node);
    }
}

impl EventReceiver for TreeBuilder<'_> {
    fn on_event(&mut self, ev: Event) {
        if self.error.is_some() {
            return;
        }
        match ev {
            Event::Scalar(value, style, anchor, tag) => self.scalar(value, style, anchor, tag),
            Event::SequenceStart(anchor, tag) => self.stack.push(Open::Sequence {
                items: Vec::new(),
                tag: tag.as_ref().map(tag_name),
                anchor,
            }),
            Event::MappingStart(anchor, tag) => self.stack.push(Open::Mapping {
                entries: Vec::new(),
                key: None,
                tag: tag.as_ref().map(tag_name),
                anchor,
            }),
            Event::SequenceEnd | Event::MappingEnd => self.close(),
            Event::Alias(id) => self.push(Node::Alias(id)),
            _ => {}
        }
    }
}

//! Flattens the markup tree into an index-addressed node table.

use domc_parser::{Attribute, AttributeValue, Element, MarkupNode, Text};
use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::entities::decode_entities;
use crate::error::{CompileError, CompileErrorKind};
use crate::interpolate::{scan, Segment};
use crate::node::{Listener, Node, NodeKind, NodeTable};

/// Prefix marking an attribute as an event listener.
const LISTENER_PREFIX: &str = "on:";

/// Elements whose body the parser keeps as raw text.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Walks the markup in pre-order, numbering nodes from 0.
///
/// Comments are skipped. Whitespace-only text outside any element is dropped.
pub fn index_markup(markup: &[&MarkupNode]) -> Result<NodeTable, CompileError> {
    let mut table = index_siblings(markup.iter().copied(), None, NodeTable::default())?;

    let mut referenced: Vec<SmolStr> = Vec::new();
    for (_, name) in table.bindings() {
        if !referenced.contains(name) {
            referenced.push(name.clone());
        }
    }
    table.referenced = referenced;

    tracing::debug!(
        nodes = table.nodes.len(),
        listeners = table.listeners.len(),
        referenced = table.referenced.len(),
        "indexed markup"
    );
    Ok(table)
}

fn index_siblings<'a>(
    nodes: impl IntoIterator<Item = &'a MarkupNode>,
    parent: Option<usize>,
    acc: NodeTable,
) -> Result<NodeTable, CompileError> {
    nodes
        .into_iter()
        .try_fold(acc, |acc, node| index_node(node, parent, acc))
}

fn index_node(
    node: &MarkupNode,
    parent: Option<usize>,
    acc: NodeTable,
) -> Result<NodeTable, CompileError> {
    match node {
        MarkupNode::Element(el) => index_element(el, parent, acc),
        MarkupNode::Text(text) => index_text(text, parent, acc),
        MarkupNode::Comment(_) => Ok(acc),
    }
}

fn index_element(
    el: &Element,
    parent: Option<usize>,
    mut acc: NodeTable,
) -> Result<NodeTable, CompileError> {
    let index = acc.nodes.len();
    let mut attributes = IndexMap::new();

    for attr in &el.attributes {
        match attr.name.strip_prefix(LISTENER_PREFIX) {
            Some(event) => acc.listeners.push(listener(index, event, attr)?),
            None => {
                attributes.insert(attr.name.clone(), static_value(attr)?);
            }
        }
    }

    acc.nodes.push(Node {
        index,
        parent,
        kind: NodeKind::Element {
            tag_name: el.name.clone(),
            attributes,
        },
        span: el.span,
    });

    if RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| el.name.eq_ignore_ascii_case(raw))
    {
        return Ok(index_raw_text(el, index, acc));
    }

    index_siblings(&el.children, Some(index), acc)
}

/// Raw-text bodies are kept verbatim: no interpolation, no entity decoding.
fn index_raw_text(el: &Element, index: usize, mut acc: NodeTable) -> NodeTable {
    for child in &el.children {
        if let MarkupNode::Text(text) = child {
            acc.nodes.push(Node {
                index: acc.nodes.len(),
                parent: Some(index),
                kind: NodeKind::StaticText {
                    text: text.data.clone(),
                },
                span: text.span,
            });
        }
    }
    acc
}

fn index_text(
    text: &Text,
    parent: Option<usize>,
    mut acc: NodeTable,
) -> Result<NodeTable, CompileError> {
    if parent.is_none() && text.is_whitespace {
        return Ok(acc);
    }

    for segment in scan(&text.data, text.span)? {
        let (kind, span) = match segment {
            Segment::Literal { text, span } => (
                NodeKind::StaticText {
                    text: decode_entities(text).into_owned(),
                },
                span,
            ),
            Segment::Binding { name, span } => (
                NodeKind::Binding {
                    property_name: SmolStr::new(name),
                },
                span,
            ),
        };
        acc.nodes.push(Node {
            index: acc.nodes.len(),
            parent,
            kind,
            span,
        });
    }

    Ok(acc)
}

fn listener(node_index: usize, event: &str, attr: &Attribute) -> Result<Listener, CompileError> {
    let invalid = |message: &str| {
        CompileError::new(
            CompileErrorKind::InvalidListener {
                attribute: attr.name.clone(),
                message: message.to_string(),
            },
            attr.span,
        )
    };

    if event.is_empty() {
        return Err(invalid("missing event name"));
    }

    let handler = match &attr.value {
        AttributeValue::True => return Err(invalid("missing handler")),
        AttributeValue::Text(value) => decode_entities(&value.value).trim().to_string(),
        AttributeValue::Expression(value) => value.expression.trim().to_string(),
    };
    if handler.is_empty() {
        return Err(invalid("missing handler"));
    }

    Ok(Listener {
        node_index,
        event_name: SmolStr::new(event),
        handler_expression: handler,
        span: attr.span,
    })
}

fn static_value(attr: &Attribute) -> Result<String, CompileError> {
    match &attr.value {
        AttributeValue::True => Ok(String::new()),
        AttributeValue::Text(value) => Ok(decode_entities(&value.value).into_owned()),
        AttributeValue::Expression(_) => Err(CompileError::new(
            CompileErrorKind::DynamicAttribute {
                name: attr.name.clone(),
            },
            attr.span,
        )),
    }
}

//! The flat node table and the records attached to it.

use domc_parser::Span;
use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

/// One runtime DOM node: an element, a static text run, or an interpolation point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Position in the table, assigned in pre-order from 0.
    pub index: usize,
    /// Index of the enclosing element, `None` for a root node.
    pub parent: Option<usize>,
    /// What this node is.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Source range this node was built from.
    pub span: Span,
}

impl Node {
    /// The runtime variable holding this node, e.g. `e0`, `t1`, `b2`.
    pub fn var_name(&self) -> String {
        format!("{}{}", self.kind.tag(), self.index)
    }

    /// Returns true if this node has no enclosing element.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The three kinds of runtime node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    /// An element, with its plain attributes in source order.
    Element {
        tag_name: SmolStr,
        attributes: IndexMap<SmolStr, String>,
    },
    /// Literal text, with character references decoded.
    StaticText { text: String },
    /// A text node showing the current value of a property.
    Binding { property_name: SmolStr },
}

impl NodeKind {
    /// Single-letter tag used in variable names.
    pub fn tag(&self) -> char {
        match self {
            NodeKind::Element { .. } => 'e',
            NodeKind::StaticText { .. } => 't',
            NodeKind::Binding { .. } => 'b',
        }
    }
}

/// An `on:<event>` attribute wiring an element event to a handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    /// The element the listener is attached to.
    pub node_index: usize,
    pub event_name: SmolStr,
    /// Handler expression, passed through unchanged.
    pub handler_expression: String,
    pub span: Span,
}

/// A reactive property declared with `export let`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: SmolStr,
    /// Source text of the initializer, applied when the prop is `undefined`.
    pub default: Option<String>,
    pub span: Span,
}

/// The result of indexing the markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeTable {
    /// Every node, in index order.
    pub nodes: Vec<Node>,
    /// Every listener, in document order.
    pub listeners: Vec<Listener>,
    /// Property names referenced by bindings, first occurrence first.
    pub referenced: Vec<SmolStr>,
}

impl NodeTable {
    /// Root nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_root())
    }

    /// Direct children of `index`, in order.
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.parent == Some(index))
    }

    /// Binding nodes with their property names.
    pub fn bindings(&self) -> impl Iterator<Item = (&Node, &SmolStr)> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::Binding { property_name } => Some((node, property_name)),
            _ => None,
        })
    }
}

//! AST types for component markup.
//!
//! The parser keeps text content raw: `{` and `}` in text are ordinary characters
//! here, and character references are not decoded. Interpretation of both is left to
//! the compiler.

use crate::span::Span;
use smol_str::SmolStr;

/// A parsed component file.
#[derive(Debug, Clone, Default)]
pub struct MarkupDocument {
    /// Top-level nodes in document order, including any `<script>` element.
    pub nodes: Vec<MarkupNode>,
    /// The span of the whole source.
    pub span: Span,
}

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub enum MarkupNode {
    /// An element, including raw-text elements like `<script>`.
    Element(Element),
    /// A run of text.
    Text(Text),
    /// An HTML comment.
    Comment(Comment),
}

impl MarkupNode {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            MarkupNode::Element(n) => n.span,
            MarkupNode::Text(n) => n.span,
            MarkupNode::Comment(n) => n.span,
        }
    }

    /// Returns the element if this node is one with the given tag name.
    pub fn as_element_named(&self, name: &str) -> Option<&Element> {
        match self {
            MarkupNode::Element(el) if el.name.eq_ignore_ascii_case(name) => Some(el),
            _ => None,
        }
    }
}

/// An element.
#[derive(Debug, Clone)]
pub struct Element {
    /// The span of the element, from `<` to the end of its closing tag.
    pub span: Span,
    /// The tag name.
    pub name: SmolStr,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes. Raw-text elements hold at most one `Text` child.
    pub children: Vec<MarkupNode>,
    /// Whether the tag was self-closing (`/>`) or a void element.
    pub self_closing: bool,
}

impl Element {
    /// Concatenated raw text of all direct text children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                MarkupNode::Text(text) => Some(text.data.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A run of text between tags.
#[derive(Debug, Clone)]
pub struct Text {
    pub span: Span,
    /// The raw text, exactly as it appears in the source.
    pub data: String,
    /// Whether the run is only whitespace.
    pub is_whitespace: bool,
}

/// A comment.
#[derive(Debug, Clone)]
pub struct Comment {
    pub span: Span,
    /// The comment content, without `<!--` and `-->`.
    pub data: String,
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// The span of the whole attribute.
    pub span: Span,
    /// The span of the attribute name.
    pub name_span: Span,
    /// The attribute name, e.g. `class` or `on:click`.
    pub name: SmolStr,
    /// The attribute value.
    pub value: AttributeValue,
}

/// An attribute value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// No value (boolean attribute).
    True,
    /// A quoted or unquoted text value.
    Text(TextValue),
    /// A braced expression value `{expr}`.
    Expression(ExpressionValue),
}

impl AttributeValue {
    /// Returns the span of the value, if there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            AttributeValue::True => None,
            AttributeValue::Text(t) => Some(t.span),
            AttributeValue::Expression(e) => Some(e.span),
        }
    }
}

/// A text attribute value.
#[derive(Debug, Clone)]
pub struct TextValue {
    /// The span of the value, excluding quotes.
    pub span: Span,
    /// The raw value.
    pub value: String,
}

/// A braced expression attribute value.
#[derive(Debug, Clone)]
pub struct ExpressionValue {
    /// The span including the braces.
    pub span: Span,
    /// The span of just the expression.
    pub expression_span: Span,
    /// The raw expression text.
    pub expression: String,
}

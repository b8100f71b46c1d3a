//! Parse error types.

use crate::span::Span;
use thiserror::Error;

/// An error that occurred while parsing markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Where in the source the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// An unexpected token was encountered.
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected.
        expected: String,
        /// What was found.
        found: String,
    },

    /// An element was never closed.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed element.
        tag_name: String,
    },

    /// A closing tag did not match the open element.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// A closing tag appeared with no open element.
    #[error("unexpected closing tag </{tag_name}>")]
    UnexpectedClosingTag {
        /// The name in the closing tag.
        tag_name: String,
    },

    /// A quoted attribute value or braced expression was never terminated.
    #[error("unterminated attribute value for `{name}`")]
    UnterminatedAttributeValue {
        /// The attribute name.
        name: String,
    },

    /// The same attribute appeared twice on one element.
    #[error("duplicate attribute: {name}")]
    DuplicateAttribute {
        /// The duplicated attribute name.
        name: String,
    },

    /// A comment was never closed with `-->`.
    #[error("unterminated comment")]
    UnterminatedComment,
}

//! Markup parser for domc component files.
//!
//! This crate turns a component source into a tree of markup nodes:
//! - Lexer (tokenizer) using `logos`
//! - Recursive descent parser with error collection
//! - AST types carrying byte spans
//! - A line index for reporting positions
//!
//! Text is kept exactly as written. In particular `{name}` interpolations are not
//! parsed here; they reach the compiler as part of the surrounding text.
//!
//! # Example
//!
//! ```
//! use domc_parser::{parse, MarkupNode};
//!
//! let source = r#"
//! <script>
//!     export let count = 0;
//! </script>
//!
//! <p>Count: {count}</p>
//! "#;
//!
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! assert!(result.document.nodes.iter().any(|n| n.as_element_named("script").is_some()));
//! ```

mod ast;
mod error;
mod lexer;
mod line_index;
mod parser;
mod span;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};

use smol_str::SmolStr;

/// Options for parsing component files.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Elements whose content is read verbatim up to the matching closing tag.
    pub raw_text_elements: Vec<SmolStr>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            raw_text_elements: vec![SmolStr::new_static("script"), SmolStr::new_static("style")],
        }
    }
}

/// The result of parsing a component file.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document.
    pub document: MarkupDocument,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses a component source into a markup tree.
///
/// Parsing continues past errors where it can, so the returned document may be
/// partial when `errors` is non-empty.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a component source with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    parser::Parser::new(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.nodes.is_empty());
    }

    #[test]
    fn test_parse_with_script() {
        let result = parse("<script>export let x = 1;</script><p>{x}</p>");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.nodes.len(), 2);
    }

    #[test]
    fn test_custom_raw_text_elements() {
        let options = ParseOptions {
            raw_text_elements: vec![SmolStr::new("textarea")],
        };
        let result = parse_with_options("<textarea><b>x</b></textarea>", options);
        assert!(result.errors.is_empty());
        match &result.document.nodes[0] {
            MarkupNode::Element(el) => assert_eq!(el.text_content(), "<b>x</b>"),
            other => panic!("Expected Element, got {:?}", other),
        }
    }
}

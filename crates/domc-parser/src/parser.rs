//! Recursive descent parser for component markup.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::Span;
use crate::{ParseOptions, ParseResult};
use smol_str::SmolStr;
use std::collections::HashSet;

/// HTML void elements, which never have children or a closing tag.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// The markup parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Byte offset just past everything consumed so far.
    offset: usize,
    /// Errors collected during parsing.
    errors: Vec<ParseError>,
    options: ParseOptions,
    /// EOF token for when we're past the end.
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::from_offsets(source.len(), source.len()),
        };
        Self {
            source,
            tokens,
            pos: 0,
            offset: 0,
            errors: Vec::new(),
            options,
            eof_token,
        }
    }

    /// Parses the source into a markup document.
    pub fn parse(mut self) -> ParseResult {
        let nodes = self.parse_nodes(None);
        ParseResult {
            document: MarkupDocument {
                nodes,
                span: Span::from_offsets(0, self.source.len()),
            },
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_text(&self) -> &'src str {
        let span = self.current().span;
        &self.source[span.start_usize()..span.end_usize()]
    }

    fn advance(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind != TokenKind::Eof {
                self.offset = token.span.end_usize();
                self.pos += 1;
            }
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(ParseErrorKind::UnexpectedToken {
                expected: kind.name().to_string(),
                found: self.current_kind().name().to_string(),
            });
            false
        }
    }

    fn error(&mut self, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(kind, self.current().span));
    }

    fn error_at(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline) {}
    }

    /// Moves past every token that starts before `offset`.
    ///
    /// Used after reading raw text straight from the source.
    fn seek(&mut self, offset: usize) {
        while !self.check(TokenKind::Eof) && self.current().span.start_usize() < offset {
            self.pos += 1;
        }
        self.offset = offset;
    }

    fn rest(&self) -> &'src str {
        &self.source[self.offset..]
    }

    fn at_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    // === Nodes ===

    /// Parses sibling nodes until EOF or a closing tag.
    ///
    /// At the top level (`parent` is `None`) a stray closing tag is reported and skipped.
    fn parse_nodes(&mut self, parent: Option<&str>) -> Vec<MarkupNode> {
        let mut nodes = Vec::new();

        while !self.at_eof() {
            let rest = self.rest();
            if rest.starts_with("</") {
                if parent.is_some() {
                    break;
                }
                self.skip_stray_closing_tag();
            } else if rest.starts_with("<!--") {
                nodes.push(self.parse_comment());
            } else if starts_tag(rest) {
                nodes.push(self.parse_element());
            } else {
                nodes.push(self.parse_text());
            }
        }

        nodes
    }

    fn skip_stray_closing_tag(&mut self) {
        let start = self.offset;
        self.advance();
        let name = if self.check(TokenKind::Name) {
            let name = self.current_text().to_string();
            self.advance();
            name
        } else {
            String::new()
        };
        self.eat(TokenKind::RAngle);
        self.error_at(
            ParseErrorKind::UnexpectedClosingTag { tag_name: name },
            Span::from_offsets(start, self.offset),
        );
    }

    fn parse_comment(&mut self) -> MarkupNode {
        let start = self.offset;
        let content_start = start + "<!--".len();
        let remaining = &self.source[content_start..];

        let (data, end) = match remaining.find("-->") {
            Some(end_pos) => (
                remaining[..end_pos].to_string(),
                content_start + end_pos + "-->".len(),
            ),
            None => {
                self.error_at(
                    ParseErrorKind::UnterminatedComment,
                    Span::from_offsets(start, content_start),
                );
                (remaining.to_string(), self.source.len())
            }
        };

        self.seek(end);
        MarkupNode::Comment(Comment {
            span: Span::from_offsets(start, end),
            data,
        })
    }

    /// Reads text up to the next tag, comment or closing tag.
    ///
    /// A `<` that does not open any of those is literal text.
    fn parse_text(&mut self) -> MarkupNode {
        let start = self.offset;
        let mut end = start;

        loop {
            let remaining = &self.source[end..];
            match remaining.find('<') {
                Some(lt) => {
                    let candidate = &remaining[lt..];
                    if end + lt > start && opens_markup(candidate) {
                        end += lt;
                        break;
                    }
                    end += lt + 1;
                }
                None => {
                    end = self.source.len();
                    break;
                }
            }
        }

        self.seek(end);
        let data = self.source[start..end].to_string();
        MarkupNode::Text(Text {
            span: Span::from_offsets(start, end),
            is_whitespace: data.chars().all(char::is_whitespace),
            data,
        })
    }

    fn parse_element(&mut self) -> MarkupNode {
        let start = self.offset;
        self.expect(TokenKind::LAngle);

        let name = SmolStr::new(self.current_text());
        self.advance();

        let attributes = self.parse_attributes();

        let explicit_self_closing = self.eat(TokenKind::SlashRAngle);
        if !explicit_self_closing {
            self.expect(TokenKind::RAngle);
        }
        let self_closing = explicit_self_closing || is_void_element(&name);

        let children = if self_closing {
            Vec::new()
        } else if self.is_raw_text_element(&name) {
            let children = self.parse_raw_text(&name);
            self.parse_closing_tag(&name, start);
            children
        } else {
            let children = self.parse_nodes(Some(&name));
            self.parse_closing_tag(&name, start);
            children
        };

        MarkupNode::Element(Element {
            span: Span::from_offsets(start, self.offset),
            name,
            attributes,
            children,
            self_closing,
        })
    }

    fn is_raw_text_element(&self, name: &str) -> bool {
        self.options
            .raw_text_elements
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(name))
    }

    /// Reads the body of a raw-text element verbatim up to its closing tag.
    fn parse_raw_text(&mut self, name: &str) -> Vec<MarkupNode> {
        let start = self.offset;
        let close = format!("</{}", name.to_ascii_lowercase());
        let end = self.source[start..]
            .to_ascii_lowercase()
            .find(&close)
            .map(|pos| start + pos)
            .unwrap_or(self.source.len());

        self.seek(end);
        if end == start {
            return Vec::new();
        }

        let data = self.source[start..end].to_string();
        vec![MarkupNode::Text(Text {
            span: Span::from_offsets(start, end),
            is_whitespace: data.chars().all(char::is_whitespace),
            data,
        })]
    }

    fn parse_closing_tag(&mut self, expected: &str, element_start: usize) {
        if !self.rest().starts_with("</") {
            self.error_at(
                ParseErrorKind::UnclosedTag {
                    tag_name: expected.to_string(),
                },
                Span::from_offsets(element_start, self.offset),
            );
            return;
        }

        let start = self.offset;
        self.advance();
        let found = if self.check(TokenKind::Name) {
            let found = self.current_text();
            self.advance();
            found
        } else {
            ""
        };
        self.skip_newlines();
        self.expect(TokenKind::RAngle);

        if !found.eq_ignore_ascii_case(expected) {
            self.error_at(
                ParseErrorKind::MismatchedClosingTag {
                    expected: expected.to_string(),
                    found: found.to_string(),
                },
                Span::from_offsets(start, self.offset),
            );
        }
    }

    // === Attributes ===

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut seen = HashSet::new();

        loop {
            self.skip_newlines();

            match self.current_kind() {
                TokenKind::RAngle | TokenKind::SlashRAngle | TokenKind::Eof => break,
                TokenKind::Name => {
                    let Some(attribute) = self.parse_attribute() else {
                        break;
                    };
                    if seen.insert(attribute.name.clone()) {
                        attributes.push(attribute);
                    } else {
                        self.error_at(
                            ParseErrorKind::DuplicateAttribute {
                                name: attribute.name.to_string(),
                            },
                            attribute.span,
                        );
                    }
                }
                _ => {
                    self.error(ParseErrorKind::UnexpectedToken {
                        expected: "attribute name".to_string(),
                        found: self.current_kind().name().to_string(),
                    });
                    self.advance();
                }
            }
        }

        attributes
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let name_span = self.current().span;
        let name = SmolStr::new(self.current_text());
        self.advance();

        self.skip_newlines();
        let value = if self.eat(TokenKind::Eq) {
            self.skip_newlines();
            self.parse_attribute_value(&name)?
        } else {
            AttributeValue::True
        };

        Some(Attribute {
            span: Span::new(name_span.start, self.offset as u32),
            name_span,
            name,
            value,
        })
    }

    fn parse_attribute_value(&mut self, name: &str) -> Option<AttributeValue> {
        match self.current_kind() {
            TokenKind::DoubleQuote => self.parse_quoted_value(name, '"'),
            TokenKind::SingleQuote => self.parse_quoted_value(name, '\''),
            TokenKind::LBrace => self.parse_expression_value(name),
            TokenKind::Name | TokenKind::Text => Some(self.parse_unquoted_value()),
            _ => {
                self.error(ParseErrorKind::UnexpectedToken {
                    expected: "attribute value".to_string(),
                    found: self.current_kind().name().to_string(),
                });
                None
            }
        }
    }

    fn parse_quoted_value(&mut self, name: &str, quote: char) -> Option<AttributeValue> {
        let open = self.current().span;
        self.advance();
        let start = self.offset;

        let Some(len) = self.source[start..].find(quote) else {
            self.error_at(
                ParseErrorKind::UnterminatedAttributeValue {
                    name: name.to_string(),
                },
                open,
            );
            self.seek(self.source.len());
            return None;
        };

        let end = start + len;
        self.seek(end);
        self.advance();

        Some(AttributeValue::Text(TextValue {
            span: Span::from_offsets(start, end),
            value: self.source[start..end].to_string(),
        }))
    }

    fn parse_unquoted_value(&mut self) -> AttributeValue {
        let start = self.current().span.start_usize();
        let len = self.source[start..]
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(self.source.len() - start);
        let end = start + len;
        self.seek(end);

        AttributeValue::Text(TextValue {
            span: Span::from_offsets(start, end),
            value: self.source[start..end].to_string(),
        })
    }

    fn parse_expression_value(&mut self, name: &str) -> Option<AttributeValue> {
        let open = self.current().span;
        self.advance();
        let start = self.offset;

        let Some(len) = find_expression_end(&self.source[start..]) else {
            self.error_at(
                ParseErrorKind::UnterminatedAttributeValue {
                    name: name.to_string(),
                },
                open,
            );
            self.seek(self.source.len());
            return None;
        };

        let end = start + len;
        self.seek(end);
        self.advance();

        Some(AttributeValue::Expression(ExpressionValue {
            span: Span::new(open.start, self.offset as u32),
            expression_span: Span::from_offsets(start, end),
            expression: self.source[start..end].to_string(),
        }))
    }
}

/// Returns true if `rest` begins an element start tag.
fn starts_tag(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Returns true if `rest` begins any markup construct that ends a text run.
fn opens_markup(rest: &str) -> bool {
    starts_tag(rest) || rest.starts_with("</") || rest.starts_with("<!--")
}

/// Finds the `}` closing a braced expression, skipping nested braces and string literals.
fn find_expression_end(expr: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut string_char: Option<char> = None;
    let mut escaped = false;

    for (i, c) in expr.char_indices() {
        if let Some(quote) = string_char {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                string_char = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => string_char = Some(c),
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParseResult {
        Parser::new(source, ParseOptions::default()).parse()
    }

    fn element(node: &MarkupNode) -> &Element {
        match node {
            MarkupNode::Element(el) => el,
            other => panic!("Expected Element, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_element() {
        let result = parse("<p>hello</p>");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.nodes.len(), 1);

        let el = element(&result.document.nodes[0]);
        assert_eq!(el.name.as_str(), "p");
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.span, Span::from_offsets(0, 12));
    }

    #[test]
    fn test_text_keeps_braces_and_whitespace() {
        let result = parse("<p> Count: {count} </p>");
        assert!(result.errors.is_empty());

        let el = element(&result.document.nodes[0]);
        if let MarkupNode::Text(text) = &el.children[0] {
            assert_eq!(text.data, " Count: {count} ");
            assert_eq!(text.span, Span::from_offsets(3, 19));
        } else {
            panic!("Expected Text");
        }
    }

    #[test]
    fn test_top_level_whitespace_is_text() {
        let result = parse("\n<p></p>\n");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.nodes.len(), 3);
        match &result.document.nodes[2] {
            MarkupNode::Text(text) => assert!(text.is_whitespace),
            other => panic!("Expected Text, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_less_than_in_text() {
        let result = parse("<p>a < b</p>");
        assert!(result.errors.is_empty());
        let el = element(&result.document.nodes[0]);
        if let MarkupNode::Text(text) = &el.children[0] {
            assert_eq!(text.data, "a < b");
        } else {
            panic!("Expected Text");
        }
    }

    #[test]
    fn test_nested_elements() {
        let result = parse("<div><span>x</span><b>y</b></div>");
        assert!(result.errors.is_empty());
        let div = element(&result.document.nodes[0]);
        assert_eq!(div.children.len(), 2);
        assert_eq!(element(&div.children[1]).name.as_str(), "b");
    }

    #[test]
    fn test_attributes_in_order() {
        let result = parse(r#"<input type="text" id='name' disabled value=plain on:input={go}>"#);
        assert!(result.errors.is_empty(), "{:?}", result.errors);

        let el = element(&result.document.nodes[0]);
        assert!(el.self_closing);
        let names: Vec<&str> = el.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["type", "id", "disabled", "value", "on:input"]);

        match &el.attributes[1].value {
            AttributeValue::Text(t) => assert_eq!(t.value, "name"),
            other => panic!("Expected Text value, got {:?}", other),
        }
        assert!(matches!(el.attributes[2].value, AttributeValue::True));
        match &el.attributes[3].value {
            AttributeValue::Text(t) => assert_eq!(t.value, "plain"),
            other => panic!("Expected Text value, got {:?}", other),
        }
        match &el.attributes[4].value {
            AttributeValue::Expression(e) => assert_eq!(e.expression, "go"),
            other => panic!("Expected Expression value, got {:?}", other),
        }
    }

    #[test]
    fn test_expression_value_with_nested_braces() {
        let result = parse(r#"<button on:click={() => { count += 1; }}>+</button>"#);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let el = element(&result.document.nodes[0]);
        match &el.attributes[0].value {
            AttributeValue::Expression(e) => assert_eq!(e.expression, "() => { count += 1; }"),
            other => panic!("Expected Expression value, got {:?}", other),
        }
    }

    #[test]
    fn test_quoted_value_with_markup_characters() {
        let result = parse(r#"<button on:click="count = count > 1 ? 0 : 1">x</button>"#);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let el = element(&result.document.nodes[0]);
        match &el.attributes[0].value {
            AttributeValue::Text(t) => assert_eq!(t.value, "count = count > 1 ? 0 : 1"),
            other => panic!("Expected Text value, got {:?}", other),
        }
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_script_is_raw_text() {
        let source = "<script>\nexport let a = 1;\nif (a < 2) { a = \"</p>\"; }\n</script>";
        let result = parse(source);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let script = element(&result.document.nodes[0]);
        assert_eq!(script.name.as_str(), "script");
        assert_eq!(
            script.text_content(),
            "\nexport let a = 1;\nif (a < 2) { a = \"</p>\"; }\n"
        );
    }

    #[test]
    fn test_comment() {
        let result = parse("<!-- note --><p></p>");
        assert!(result.errors.is_empty());
        match &result.document.nodes[0] {
            MarkupNode::Comment(c) => assert_eq!(c.data, " note "),
            other => panic!("Expected Comment, got {:?}", other),
        }
        assert_eq!(result.document.nodes.len(), 2);
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let result = parse("<p>text</div>");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::MismatchedClosingTag { .. }
        ));
    }

    #[test]
    fn test_unclosed_tag() {
        let result = parse("<div><p>text</p>");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::UnclosedTag {
                tag_name: "div".to_string()
            }
        );
    }

    #[test]
    fn test_stray_closing_tag() {
        let result = parse("</p>");
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::UnexpectedClosingTag {
                tag_name: "p".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_attribute() {
        let result = parse(r#"<p id="a" id="b"></p>"#);
        assert_eq!(
            result.errors[0].kind,
            ParseErrorKind::DuplicateAttribute {
                name: "id".to_string()
            }
        );
        let el = element(&result.document.nodes[0]);
        assert_eq!(el.attributes.len(), 1);
    }

    #[test]
    fn test_unterminated_attribute_value() {
        let result = parse(r#"<p class="open></p>"#);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnterminatedAttributeValue { .. }
        ));
    }

    #[test]
    fn test_find_expression_end_skips_strings() {
        assert_eq!(find_expression_end("a + '}' }"), Some(8));
        assert_eq!(find_expression_end("{ x }}"), Some(5));
        assert_eq!(find_expression_end("open"), None);
    }
}

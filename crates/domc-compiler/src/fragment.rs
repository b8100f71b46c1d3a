//! Splits a parsed component into its script block and its markup.

use domc_parser::{MarkupNode, Span};

use crate::error::{CompileError, CompileErrorKind};

/// The text of the component's `<script>` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptSource {
    /// Script text, exactly as written.
    pub content: String,
    /// Where `content` starts and ends in the component source.
    pub span: Span,
}

/// A component split into script text and top-level markup.
#[derive(Debug)]
pub struct Fragment<'a> {
    pub script: ScriptSource,
    /// Every top-level node except the script block and comments, in order.
    pub markup: Vec<&'a MarkupNode>,
}

/// Separates the single top-level `<script>` block from the rest of the markup.
///
/// A component without a script block gets empty script text.
pub fn split_fragment(nodes: &[MarkupNode]) -> Result<Fragment<'_>, CompileError> {
    let mut script: Option<ScriptSource> = None;
    let mut markup = Vec::new();

    for node in nodes {
        match node {
            MarkupNode::Comment(_) => {}
            MarkupNode::Element(el) if el.name.eq_ignore_ascii_case("script") => {
                if script.is_some() {
                    return Err(CompileError::new(CompileErrorKind::MultipleScripts, el.span));
                }
                let span = match (el.children.first(), el.children.last()) {
                    (Some(first), Some(last)) => first.span().cover(last.span()),
                    _ => Span::empty(el.span.end),
                };
                script = Some(ScriptSource {
                    content: el.text_content(),
                    span,
                });
            }
            _ => markup.push(node),
        }
    }

    Ok(Fragment {
        script: script.unwrap_or_default(),
        markup,
    })
}

//! Splits a text run into literal pieces and `{name}` interpolations.

use domc_parser::Span;

use crate::error::{CompileError, CompileErrorKind};

/// One piece of a scanned text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any braces.
    Literal { text: &'a str, span: Span },
    /// The text between `{` and `}`, verbatim.
    Binding { name: &'a str, span: Span },
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Outside braces; the pending literal starts at `start`.
    Literal { start: usize },
    /// Inside braces opened at `open`.
    Bound { open: usize },
}

/// Scans `text`, which starts at `span.start` in the component source.
///
/// Empty literal pieces are not produced, so `{a}{b}` yields two bindings and an
/// empty run yields nothing.
pub fn scan(text: &str, span: Span) -> Result<Vec<Segment<'_>>, CompileError> {
    let mut segments = Vec::new();
    let mut state = State::Literal { start: 0 };

    for (i, c) in text.char_indices() {
        state = match (state, c) {
            (State::Literal { start }, '{') => {
                if i > start {
                    segments.push(Segment::Literal {
                        text: &text[start..i],
                        span: span.slice(start, i),
                    });
                }
                State::Bound { open: i }
            }
            (State::Literal { .. }, '}') => {
                return Err(CompileError::new(
                    CompileErrorKind::UnmatchedClosingBrace,
                    span.slice(i, i + 1),
                ));
            }
            (State::Bound { open }, '}') => {
                segments.push(Segment::Binding {
                    name: &text[open + 1..i],
                    span: span.slice(open, i + 1),
                });
                State::Literal { start: i + 1 }
            }
            (State::Bound { open }, '{') => {
                return Err(CompileError::new(
                    CompileErrorKind::NestedInterpolation {
                        text: text[open..=i].to_string(),
                    },
                    span.slice(open, i + 1),
                ));
            }
            (state, _) => state,
        };
    }

    match state {
        State::Literal { start } => {
            if start < text.len() {
                segments.push(Segment::Literal {
                    text: &text[start..],
                    span: span.slice(start, text.len()),
                });
            }
            Ok(segments)
        }
        State::Bound { open } => Err(CompileError::new(
            CompileErrorKind::UnterminatedInterpolation {
                text: text[open..].to_string(),
            },
            span.slice(open, text.len()),
        )),
    }
}

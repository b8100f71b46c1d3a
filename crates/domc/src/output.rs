//! Diagnostic and stdout formatting.

use std::fmt;

use camino::Utf8Path;
use domc_compiler::{CompileError, NodeTable, Property, Warning};
use domc_parser::{ByteOffset, LineIndex, Span};
use miette::{Diagnostic, LabeledSpan, NamedSource, Report, Severity, SourceCode};
use serde::Serialize;
use thiserror::Error;

use crate::cli::DiagnosticFormat;

/// A compile error or warning with its source attached, for `miette` rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    code: String,
    severity: Severity,
    help: Option<String>,
    label: String,
    span: Span,
    src: NamedSource<String>,
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = (self.span.start_usize(), u32::from(self.span.len()) as usize);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.clone()),
            span,
        ))))
    }
}

/// A diagnostic as printed by `--diagnostics json`.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// `error` or `warning`.
    #[serde(rename = "type")]
    pub diagnostic_type: &'static str,
    pub filename: String,
    pub start: Position,
    pub end: Position,
    pub message: String,
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// What `--emit nodes` prints.
#[derive(Debug, Serialize)]
pub struct NodesDump<'a> {
    pub properties: &'a [Property],
    #[serde(flatten)]
    pub table: &'a NodeTable,
}

/// Writes diagnostics for one component to stderr.
pub struct Reporter<'a> {
    format: DiagnosticFormat,
    path: &'a Utf8Path,
    source: &'a str,
    line_index: LineIndex,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter for the component at `path`.
    pub fn new(format: DiagnosticFormat, path: &'a Utf8Path, source: &'a str) -> Self {
        Self {
            format,
            path,
            source,
            line_index: LineIndex::new(source),
        }
    }

    /// Reports a fatal error.
    pub fn error(&self, error: &CompileError) {
        let code = format!("domc::{}", error.category());
        let diagnostic = self.diagnostic(
            error.to_string(),
            code,
            Severity::Error,
            error.help(),
            error.span,
        );
        eprintln!("{}", self.render(diagnostic));
    }

    /// Reports warnings, in order.
    pub fn warnings(&self, warnings: &[Warning]) {
        for warning in warnings {
            let code = format!("domc::{}", warning.code());
            let diagnostic = self.diagnostic(
                warning.to_string(),
                code,
                Severity::Warning,
                None,
                warning.span,
            );
            eprintln!("{}", self.render(diagnostic));
        }
    }

    fn diagnostic(
        &self,
        message: String,
        code: String,
        severity: Severity,
        help: Option<String>,
        span: Span,
    ) -> SourceDiagnostic {
        SourceDiagnostic {
            label: match severity {
                Severity::Warning => "referenced here".to_string(),
                _ => "here".to_string(),
            },
            message,
            code,
            severity,
            help,
            span,
            src: NamedSource::new(self.path.as_str(), self.source.to_string()),
        }
    }

    fn render(&self, diagnostic: SourceDiagnostic) -> String {
        match self.format {
            DiagnosticFormat::Human => format!("{:?}", Report::new(diagnostic)),
            DiagnosticFormat::Json => {
                serde_json::to_string(&self.to_json(&diagnostic)).unwrap_or_default()
            }
        }
    }

    /// Converts a diagnostic into its JSON form, with 1-based positions.
    pub fn to_json(&self, diagnostic: &SourceDiagnostic) -> JsonDiagnostic {
        JsonDiagnostic {
            diagnostic_type: match diagnostic.severity {
                Severity::Warning | Severity::Advice => "warning",
                Severity::Error => "error",
            },
            filename: self.path.to_string(),
            start: self.position(diagnostic.span.start),
            end: self.position(diagnostic.span.end),
            message: diagnostic.message.clone(),
            code: diagnostic.code.clone(),
        }
    }

    fn position(&self, offset: ByteOffset) -> Position {
        let line_col = self.line_index.line_col(offset);
        Position {
            line: line_col.line + 1,
            column: line_col.col + 1,
            offset: u32::from(offset),
        }
    }
}

//! Compile errors and warnings.

use std::fmt;

use domc_parser::{ParseError, ParseErrorKind, Span};
use smol_str::SmolStr;
use thiserror::Error;

/// A fatal error that aborts compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct CompileError {
    /// The kind of error.
    pub kind: CompileErrorKind,
    /// Where in the component source the error occurred.
    pub span: Span,
}

impl CompileError {
    /// Creates a new compile error.
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The broad category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// A short hint on how to fix the error, if there is one.
    pub fn help(&self) -> Option<String> {
        match &self.kind {
            CompileErrorKind::UnresolvedBinding {
                suggestion: Some(name),
                ..
            } => Some(format!("did you mean `{{{name}}}`?")),
            CompileErrorKind::UnresolvedBinding { name, .. } => Some(format!(
                "declare it in the script block with `export let {};`",
                name.trim()
            )),
            CompileErrorKind::InvalidBindingName { .. } => {
                Some("an interpolation must name a single exported property".to_string())
            }
            CompileErrorKind::MultipleScripts => {
                Some("merge the script blocks into a single <script>".to_string())
            }
            CompileErrorKind::UnsupportedExport { .. } => Some(
                "properties are declared with `export let name;` or `export let name = value;`"
                    .to_string(),
            ),
            CompileErrorKind::ReservedProperty { .. } => Some(
                "`component`, `target`, `props`, `changes`, `document`, `undefined` and node names like `e0` are reserved"
                    .to_string(),
            ),
            CompileErrorKind::DynamicAttribute { .. } => {
                Some("attribute values must be static strings".to_string())
            }
            CompileErrorKind::InvalidListener { .. } => {
                Some("listeners are written as `on:event={handler}`".to_string())
            }
            CompileErrorKind::UnterminatedInterpolation { .. }
            | CompileErrorKind::NestedInterpolation { .. }
            | CompileErrorKind::UnmatchedClosingBrace => Some(
                "interpolations are written as `{name}`; braces cannot be nested".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> Self {
        Self::new(CompileErrorKind::Markup(error.kind), error.span)
    }
}

/// The kind of compile error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    /// The markup could not be parsed.
    #[error("{0}")]
    Markup(ParseErrorKind),

    /// More than one top-level `<script>` block.
    #[error("a component may contain only one <script> block")]
    MultipleScripts,

    /// An export that does not declare a property.
    #[error("unsupported export: {message}")]
    UnsupportedExport {
        /// What was found.
        message: String,
    },

    /// The same property was exported twice.
    #[error("property `{name}` is declared more than once")]
    DuplicateProperty {
        /// The property name.
        name: SmolStr,
    },

    /// A script name that collides with a name the compiled module uses.
    #[error("name `{name}` is reserved by the compiled module")]
    ReservedProperty {
        /// The declared name.
        name: SmolStr,
    },

    /// An `on:` attribute that cannot become a listener.
    #[error("invalid listener `{attribute}`: {message}")]
    InvalidListener {
        /// The full attribute name.
        attribute: SmolStr,
        /// What is wrong with it.
        message: String,
    },

    /// A plain attribute with a `{...}` value.
    #[error("attribute `{name}` has a dynamic value")]
    DynamicAttribute {
        /// The attribute name.
        name: SmolStr,
    },

    /// An interpolation that is not a plain identifier.
    #[error("`{{{name}}}` is not a valid property name")]
    InvalidBindingName {
        /// The text between the braces.
        name: String,
    },

    /// An interpolation naming a property the script never exports.
    #[error("`{{{name}}}` does not refer to an exported property")]
    UnresolvedBinding {
        /// The text between the braces.
        name: String,
        /// A declared property the binding probably meant.
        suggestion: Option<SmolStr>,
    },

    /// A `{` with no closing `}`.
    #[error("unterminated interpolation `{text}`: missing `}}`")]
    UnterminatedInterpolation {
        /// The text from the opening brace to the end of the run.
        text: String,
    },

    /// A `{` inside an open interpolation.
    #[error("nested `{{` in interpolation `{text}`")]
    NestedInterpolation {
        /// The text from the outer opening brace to the nested one.
        text: String,
    },

    /// A `}` outside any interpolation.
    #[error("unmatched `}}` in text")]
    UnmatchedClosingBrace,

    /// The script block is not a valid module.
    #[error("script syntax error: {message}")]
    Script {
        /// The message reported by the script parser.
        message: String,
    },
}

impl CompileErrorKind {
    /// The broad category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileErrorKind::UnterminatedInterpolation { .. }
            | CompileErrorKind::NestedInterpolation { .. }
            | CompileErrorKind::UnmatchedClosingBrace => ErrorCategory::InterpolationSyntax,
            CompileErrorKind::Script { .. } => ErrorCategory::ScriptSyntax,
            _ => ErrorCategory::StructuralInput,
        }
    }
}

/// Broad error categories, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The component's overall structure is invalid.
    StructuralInput,
    /// An interpolation in text is malformed.
    InterpolationSyntax,
    /// The script block failed to parse.
    ScriptSyntax,
}

impl ErrorCategory {
    /// A stable code for this category.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::StructuralInput => "structural-input",
            ErrorCategory::InterpolationSyntax => "interpolation-syntax",
            ErrorCategory::ScriptSyntax => "script-syntax",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-fatal finding. Compilation still produces output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct Warning {
    /// The kind of warning.
    pub kind: WarningKind,
    /// Where in the component source the warning applies.
    pub span: Span,
}

/// The kind of warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    /// An interpolation naming an undeclared property.
    #[error("`{{{name}}}` does not refer to an exported property")]
    UnresolvedBinding {
        /// The property name.
        name: SmolStr,
    },

    /// A listener handler naming nothing the script declares.
    #[error("handler `{handler}` is not declared in the script block")]
    UnresolvedHandler {
        /// The handler expression.
        handler: String,
    },
}

impl Warning {
    /// A stable code for this warning.
    pub fn code(&self) -> &'static str {
        match self.kind {
            WarningKind::UnresolvedBinding { .. } => "unresolved-binding",
            WarningKind::UnresolvedHandler { .. } => "unresolved-handler",
        }
    }
}

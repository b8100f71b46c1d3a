//! Separates exported properties from the other top-level script statements.

use std::sync::Arc;

use domc_parser::Span;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use swc_common::{BytePos, FileName, SourceMap, Span as SwcSpan, Spanned};
use swc_ecma_ast::{
    Decl, EsVersion, ImportSpecifier, Module, ModuleDecl, ModuleItem, ObjectPatProp, Pat, Stmt,
};
use swc_ecma_parser::{parse_file_as_module, EsSyntax, Syntax};

use crate::error::{CompileError, CompileErrorKind};
use crate::fragment::ScriptSource;
use crate::node::Property;

/// Where a preserved statement is placed in the compiled module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At module scope, above the component factory. Used for imports.
    Module,
    /// Inside the component factory body.
    Instance,
}

/// A top-level statement that is not a property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestStatement {
    /// Source text, exactly as written.
    pub source: String,
    pub placement: Placement,
    /// Top-level names this statement declares.
    pub declared: Vec<SmolStr>,
    pub span: Span,
}

/// The script block, partitioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptParts {
    /// Exported properties in declaration order.
    pub properties: Vec<Property>,
    /// Every other top-level statement, in order.
    pub statements: Vec<RestStatement>,
}

/// Parses the script block and partitions its top-level statements.
pub fn extract_properties(script: &ScriptSource) -> Result<ScriptParts, CompileError> {
    if script.content.trim().is_empty() {
        return Ok(ScriptParts::default());
    }

    let (module, file_start) = parse_script(script)?;
    let slicer = Slicer { script, file_start };

    let mut parts = ScriptParts::default();
    let mut seen = FxHashSet::default();

    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                let Decl::Var(var) = &export.decl else {
                    return Err(slicer.unsupported(export.span, declaration_label(&export.decl)));
                };
                for declarator in &var.decls {
                    let Pat::Ident(ident) = &declarator.name else {
                        return Err(slicer.unsupported(declarator.span, "destructuring pattern"));
                    };
                    let name = SmolStr::new(ident.id.sym.to_string());
                    let span = slicer.span(declarator.span);
                    if is_reserved_name(&name) {
                        return Err(CompileError::new(
                            CompileErrorKind::ReservedProperty { name },
                            span,
                        ));
                    }
                    if !seen.insert(name.clone()) {
                        return Err(CompileError::new(
                            CompileErrorKind::DuplicateProperty { name },
                            span,
                        ));
                    }
                    parts.properties.push(Property {
                        name,
                        default: declarator
                            .init
                            .as_ref()
                            .map(|init| slicer.text(init.span()).to_string()),
                        span,
                    });
                }
            }
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                let declared = import
                    .specifiers
                    .iter()
                    .map(|specifier| match specifier {
                        ImportSpecifier::Named(s) => SmolStr::new(s.local.sym.to_string()),
                        ImportSpecifier::Default(s) => SmolStr::new(s.local.sym.to_string()),
                        ImportSpecifier::Namespace(s) => SmolStr::new(s.local.sym.to_string()),
                    })
                    .collect();
                parts
                    .statements
                    .push(slicer.statement(import.span, Placement::Module, declared));
            }
            ModuleItem::ModuleDecl(other) => {
                return Err(slicer.unsupported(other.span(), module_decl_label(other)));
            }
            ModuleItem::Stmt(stmt) => {
                let mut declared = Vec::new();
                if let Stmt::Decl(decl) = stmt {
                    collect_decl_names(decl, &mut declared);
                }
                parts
                    .statements
                    .push(slicer.statement(stmt.span(), Placement::Instance, declared));
            }
        }
    }

    check_statement_names(&parts)?;

    tracing::debug!(
        properties = parts.properties.len(),
        statements = parts.statements.len(),
        "partitioned script"
    );
    Ok(parts)
}

fn parse_script(script: &ScriptSource) -> Result<(Module, BytePos), CompileError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("component-script".into()).into(),
        script.content.clone(),
    );
    let syntax = Syntax::Es(EsSyntax {
        jsx: false,
        ..Default::default()
    });

    let mut recovered = Vec::new();
    let slicer = Slicer {
        script,
        file_start: fm.start_pos,
    };
    let module = parse_file_as_module(&fm, syntax, EsVersion::Es2022, None, &mut recovered)
        .map_err(|err| slicer.syntax_error(err.span(), err.kind().msg().into_owned()))?;

    // Recoverable errors still mean the script is invalid.
    if let Some(err) = recovered.into_iter().next() {
        return Err(slicer.syntax_error(err.span(), err.kind().msg().into_owned()));
    }

    Ok((module, fm.start_pos))
}

/// Maps swc spans back onto the component source.
struct Slicer<'a> {
    script: &'a ScriptSource,
    file_start: BytePos,
}

impl Slicer<'_> {
    fn offsets(&self, span: SwcSpan) -> (usize, usize) {
        let len = self.script.content.len();
        let lo = (span.lo.0.saturating_sub(self.file_start.0) as usize).min(len);
        let hi = (span.hi.0.saturating_sub(self.file_start.0) as usize).clamp(lo, len);
        (lo, hi)
    }

    fn text(&self, span: SwcSpan) -> &str {
        let (lo, hi) = self.offsets(span);
        &self.script.content[lo..hi]
    }

    fn span(&self, span: SwcSpan) -> Span {
        let (lo, hi) = self.offsets(span);
        self.script.span.slice(lo, hi)
    }

    fn statement(
        &self,
        span: SwcSpan,
        placement: Placement,
        declared: Vec<SmolStr>,
    ) -> RestStatement {
        RestStatement {
            source: self.text(span).to_string(),
            placement,
            declared,
            span: self.span(span),
        }
    }

    fn unsupported(&self, span: SwcSpan, what: &str) -> CompileError {
        CompileError::new(
            CompileErrorKind::UnsupportedExport {
                message: format!("{what} cannot be exported as a property"),
            },
            self.span(span),
        )
    }

    fn syntax_error(&self, span: SwcSpan, message: String) -> CompileError {
        CompileError::new(CompileErrorKind::Script { message }, self.span(span))
    }
}

/// Names the compiled module declares itself: the factory, its parameters,
/// the DOM global, `undefined` (tested by property defaults) and node locals
/// such as `e0`.
fn is_reserved_name(name: &str) -> bool {
    if matches!(
        name,
        "component" | "target" | "props" | "changes" | "document" | "undefined"
    ) {
        return true;
    }
    let mut chars = name.chars();
    matches!(chars.next(), Some('e' | 't' | 'b'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}

/// Names declared by other statements share the factory scope with the
/// properties and node locals.
fn check_statement_names(parts: &ScriptParts) -> Result<(), CompileError> {
    for statement in &parts.statements {
        for name in &statement.declared {
            if is_reserved_name(name) {
                return Err(CompileError::new(
                    CompileErrorKind::ReservedProperty { name: name.clone() },
                    statement.span,
                ));
            }
            if parts.properties.iter().any(|p| p.name == *name) {
                return Err(CompileError::new(
                    CompileErrorKind::DuplicateProperty { name: name.clone() },
                    statement.span,
                ));
            }
        }
    }
    Ok(())
}

fn collect_decl_names(decl: &Decl, names: &mut Vec<SmolStr>) {
    match decl {
        Decl::Var(var) => {
            for declarator in &var.decls {
                collect_pat_names(&declarator.name, names);
            }
        }
        Decl::Fn(f) => names.push(SmolStr::new(f.ident.sym.to_string())),
        Decl::Class(c) => names.push(SmolStr::new(c.ident.sym.to_string())),
        _ => {}
    }
}

fn collect_pat_names(pat: &Pat, names: &mut Vec<SmolStr>) {
    match pat {
        Pat::Ident(ident) => names.push(SmolStr::new(ident.id.sym.to_string())),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.push(SmolStr::new(assign.key.sym.to_string()))
                    }
                    ObjectPatProp::Rest(rest) => collect_pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => collect_pat_names(&rest.arg, names),
        Pat::Assign(assign) => collect_pat_names(&assign.left, names),
        _ => {}
    }
}

fn declaration_label(decl: &Decl) -> &'static str {
    match decl {
        Decl::Fn(_) => "a function declaration",
        Decl::Class(_) => "a class declaration",
        _ => "this declaration",
    }
}

fn module_decl_label(decl: &ModuleDecl) -> &'static str {
    match decl {
        ModuleDecl::ExportNamed(_) => "an export list",
        ModuleDecl::ExportDefaultDecl(_) | ModuleDecl::ExportDefaultExpr(_) => {
            "a default export"
        }
        ModuleDecl::ExportAll(_) => "a re-export",
        _ => "this export",
    }
}

//! Compiler from domc components to dependency-free DOM modules.
//!
//! A component is a `<script>` block plus markup. The script's `export let`
//! declarations become properties, `{name}` in text shows a property, and
//! `on:event={handler}` wires a listener. The output is a JavaScript module:
//!
//! ```js
//! export default function component(target, props) {
//!   // ...
//!   return { create() {}, mount() {}, update(changes) {}, detach() {} };
//! }
//! ```
//!
//! Compilation runs these stages in order, each a plain function:
//! - [`split_fragment`]: separate the script block from the markup
//! - [`extract_properties`]: partition the script into properties and other statements
//! - [`index_markup`]: flatten the markup into a [`NodeTable`]
//! - [`resolve_bindings`]: check bindings against the declared properties
//! - [`emit`]: build the lifecycle methods
//! - [`print_module`]: render the module as source text
//!
//! # Example
//!
//! ```
//! use domc_compiler::{compile, CompileOptions};
//!
//! let source = r#"
//! <script>
//!     export let count = 0;
//! </script>
//!
//! <p>Count: {count}</p>
//! "#;
//!
//! let output = compile(source, &CompileOptions::default()).unwrap();
//! assert!(output.code.contains("b2.data = count;"));
//! ```

mod emit;
mod entities;
mod error;
mod fragment;
mod index;
mod interpolate;
mod js;
mod node;
mod printer;
mod props;
mod resolve;

pub use emit::emit;
pub use entities::decode_entities;
pub use error::{CompileError, CompileErrorKind, ErrorCategory, Warning, WarningKind};
pub use fragment::{split_fragment, Fragment, ScriptSource};
pub use index::index_markup;
pub use interpolate::{scan, Segment};
pub use js::{is_valid_identifier, BodyItem, CompiledModule, Expr, Method, Stmt};
pub use node::{Listener, Node, NodeKind, NodeTable, Property};
pub use printer::{print_module, print_stmt, quote};
pub use props::{extract_properties, Placement, RestStatement, ScriptParts};
pub use resolve::{resolve_bindings, UnresolvedPolicy};

/// Options for compiling a component.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Name of the component file, used in logs.
    pub filename: Option<String>,
    /// How to treat `{name}` bindings that name no exported property.
    pub unresolved: UnresolvedPolicy,
}

/// Everything produced by a successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The compiled JavaScript module.
    pub code: String,
    /// The module before printing.
    pub module: CompiledModule,
    /// Declared properties, in declaration order.
    pub properties: Vec<Property>,
    /// The node table, listeners and referenced properties.
    pub table: NodeTable,
    /// Non-fatal findings.
    pub warnings: Vec<Warning>,
}

/// Compiles a component source into a JavaScript module.
///
/// The first fatal problem aborts compilation; no partial output is produced.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let _span = tracing::debug_span!(
        "compile",
        file = options.filename.as_deref().unwrap_or("<input>")
    )
    .entered();

    let parsed = domc_parser::parse(source);
    if let Some(error) = parsed.errors.into_iter().next() {
        return Err(error.into());
    }

    let fragment = split_fragment(&parsed.document.nodes)?;
    tracing::debug!(
        script_bytes = fragment.script.content.len(),
        markup_nodes = fragment.markup.len(),
        "split fragment"
    );

    let script = extract_properties(&fragment.script)?;
    let table = index_markup(&fragment.markup)?;
    let warnings = resolve_bindings(
        &script.properties,
        &table,
        &script.statements,
        options.unresolved,
    )?;
    let module = emit(&script.properties, &table, &script.statements);
    let code = print_module(&module);

    Ok(CompileOutput {
        code,
        module,
        properties: script.properties,
        table,
        warnings,
    })
}

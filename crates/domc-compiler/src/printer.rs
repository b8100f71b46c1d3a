//! Renders a [`CompiledModule`] as JavaScript source.

use std::fmt::Write as _;

use crate::js::{BodyItem, CompiledModule, Expr, Method, Stmt};

const INDENT: &str = "  ";

/// Prints the module with two-space indentation and a trailing newline.
pub fn print_module(module: &CompiledModule) -> String {
    let mut out = String::new();

    for statement in &module.module_statements {
        out.push_str(statement);
        out.push('\n');
    }
    if !module.module_statements.is_empty() {
        out.push('\n');
    }

    out.push_str("export default function component(target, props) {\n");

    let mut sections = Vec::new();
    if !module.params.is_empty() {
        sections.push(format!(
            "{INDENT}let {{ {} }} = props;\n",
            module.params.join(", ")
        ));
    }
    if !module.statements.is_empty() {
        let mut section = String::new();
        for item in &module.statements {
            match item {
                // Only the first line moves; later lines may sit inside a template literal.
                BodyItem::Verbatim(source) => {
                    let _ = writeln!(section, "{INDENT}{source}");
                }
                BodyItem::Stmt(stmt) => write_stmt(&mut section, stmt, 1),
            }
        }
        sections.push(section);
    }
    if !module.locals.is_empty() {
        sections.push(format!("{INDENT}let {};\n", module.locals.join(", ")));
    }
    sections.push(lifecycle(&module.methods, 1));

    out.push_str(&sections.join("\n"));
    out.push_str("}\n");
    out
}

/// Prints one statement at column zero, without a trailing newline.
pub fn print_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    write_stmt(&mut out, stmt, 0);
    out.trim_end().to_string()
}

fn lifecycle(methods: &[Method], depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    if methods.is_empty() {
        return format!("{pad}return {{}};\n");
    }
    let methods: Vec<String> = methods.iter().map(|m| method(m, depth + 1)).collect();
    format!("{pad}return {{\n{}\n{pad}}};\n", methods.join(",\n\n"))
}

fn method(method: &Method, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    let signature = format!("{}({})", method.name, method.params.join(", "));
    if method.body.is_empty() {
        return format!("{pad}{signature} {{}}");
    }
    let mut body = String::new();
    for stmt in &method.body {
        write_stmt(&mut body, stmt, depth + 1);
    }
    format!("{pad}{signature} {{\n{body}{pad}}}")
}

/// Writes `stmt` with its generated lines indented `depth` steps. Raw source
/// inside it is copied as is.
fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::Expr(expr) => {
            let _ = writeln!(out, "{pad}{};", expr_to_string(expr));
        }
        Stmt::If { test, consequent } => {
            let _ = writeln!(out, "{pad}if ({}) {{", expr_to_string(test));
            for stmt in consequent {
                write_stmt(out, stmt, depth + 1);
            }
            let _ = writeln!(out, "{pad}}}");
        }
    }
}

fn expr_to_string(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Str(value) => quote(value),
        Expr::Member { object, property } => format!("{}.{}", expr_to_string(object), property),
        Expr::Call { callee, args } => format!(
            "{}({})",
            expr_to_string(callee),
            args.iter()
                .map(expr_to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Expr::Assign { target, value } => {
            format!("{} = {}", expr_to_string(target), expr_to_string(value))
        }
        Expr::In { key, object } => format!("{} in {}", expr_to_string(key), expr_to_string(object)),
        Expr::StrictEq { left, right } => {
            format!("{} === {}", expr_to_string(left), expr_to_string(right))
        }
        Expr::Raw(source) => source.clone(),
    }
}

/// Quotes `value` as a double-quoted, single-line string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() && (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

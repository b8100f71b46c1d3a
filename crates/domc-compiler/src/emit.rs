//! Builds the lifecycle methods of the compiled module.

use crate::js::{BodyItem, CompiledModule, Expr, Method, Stmt};
use crate::node::{Node, NodeKind, NodeTable, Property};
use crate::props::{Placement, RestStatement};

/// Parameter of the factory holding the mount point.
const TARGET: &str = "target";
/// Parameter of `update` holding changed property values.
const CHANGES: &str = "changes";

/// Emits the module for a component.
pub fn emit(
    properties: &[Property],
    table: &NodeTable,
    statements: &[RestStatement],
) -> CompiledModule {
    let vars: Vec<String> = table.nodes.iter().map(Node::var_name).collect();

    let (module_statements, statements): (Vec<_>, Vec<_>) = statements
        .iter()
        .partition(|statement| statement.placement == Placement::Module);

    let module = CompiledModule {
        module_statements: module_statements
            .into_iter()
            .map(|s| s.source.clone())
            .collect(),
        params: properties.iter().map(|p| p.name.to_string()).collect(),
        statements: body(properties, &statements),
        locals: vars.clone(),
        methods: vec![
            Method::new("create", Vec::new(), create(table, &vars)),
            Method::new("mount", Vec::new(), mount(table, &vars)),
            Method::new("update", vec![CHANGES.to_string()], update(table, &vars)),
            Method::new("detach", Vec::new(), detach(table, &vars)),
        ],
    };

    tracing::debug!(
        locals = module.locals.len(),
        hoisted = module.module_statements.len(),
        "emitted lifecycle"
    );
    module
}

/// Interleaves property defaults with the instance statements by source position,
/// so a default runs where its declaration stood.
fn body(properties: &[Property], statements: &[&RestStatement]) -> Vec<BodyItem> {
    let mut items: Vec<(usize, BodyItem)> = statements
        .iter()
        .map(|s| (s.span.start_usize(), BodyItem::Verbatim(s.source.clone())))
        .collect();
    for property in properties {
        if let Some(default) = &property.default {
            let stmt = apply_default(property, default);
            items.push((property.span.start_usize(), BodyItem::Stmt(stmt)));
        }
    }
    items.sort_by_key(|(start, _)| *start);
    items.into_iter().map(|(_, item)| item).collect()
}

/// `if (name === undefined) { name = default; }`, matching destructuring defaults.
fn apply_default(property: &Property, default: &str) -> Stmt {
    let name = || Expr::ident(property.name.as_str());
    Stmt::If {
        test: name().strict_eq(Expr::ident("undefined")),
        consequent: vec![name().assign(Expr::Raw(default.to_string())).into_stmt()],
    }
}

fn create(table: &NodeTable, vars: &[String]) -> Vec<Stmt> {
    let document = || Expr::ident("document");
    let mut body = Vec::new();

    for node in &table.nodes {
        let var = || Expr::ident(&vars[node.index]);
        match &node.kind {
            NodeKind::Element {
                tag_name,
                attributes,
            } => {
                body.push(
                    var()
                        .assign(
                            document()
                                .member("createElement")
                                .call(vec![Expr::str(tag_name.as_str())]),
                        )
                        .into_stmt(),
                );
                for (name, value) in attributes {
                    body.push(
                        var()
                            .member("setAttribute")
                            .call(vec![Expr::str(name.as_str()), Expr::str(value)])
                            .into_stmt(),
                    );
                }
            }
            NodeKind::StaticText { text } => body.push(
                var()
                    .assign(
                        document()
                            .member("createTextNode")
                            .call(vec![Expr::str(text)]),
                    )
                    .into_stmt(),
            ),
            NodeKind::Binding { property_name } => body.push(
                var()
                    .assign(
                        document()
                            .member("createTextNode")
                            .call(vec![Expr::ident(property_name.as_str())]),
                    )
                    .into_stmt(),
            ),
        }
    }

    for listener in &table.listeners {
        body.push(
            Expr::ident(&vars[listener.node_index])
                .member("addEventListener")
                .call(vec![
                    Expr::str(listener.event_name.as_str()),
                    Expr::Raw(listener.handler_expression.clone()),
                ])
                .into_stmt(),
        );
    }

    body
}

/// Attaches each subtree bottom-up, then the roots to the target.
fn mount(table: &NodeTable, vars: &[String]) -> Vec<Stmt> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); table.nodes.len()];
    for node in &table.nodes {
        if let Some(parent) = node.parent {
            children[parent].push(node.index);
        }
    }

    let mut body = Vec::new();
    for root in table.roots() {
        attach_children(root.index, &children, vars, &mut body);
    }
    for root in table.roots() {
        body.push(append(Expr::ident(TARGET), &vars[root.index]));
    }
    body
}

fn attach_children(
    index: usize,
    children: &[Vec<usize>],
    vars: &[String],
    body: &mut Vec<Stmt>,
) {
    for &child in &children[index] {
        attach_children(child, children, vars, body);
        body.push(append(Expr::ident(&vars[index]), &vars[child]));
    }
}

fn append(parent: Expr, child: &str) -> Stmt {
    parent
        .member("appendChild")
        .call(vec![Expr::ident(child)])
        .into_stmt()
}

fn update(table: &NodeTable, vars: &[String]) -> Vec<Stmt> {
    table
        .bindings()
        .map(|(node, name)| Stmt::If {
            test: Expr::str(name.as_str()).is_in(Expr::ident(CHANGES)),
            consequent: vec![
                Expr::ident(name.as_str())
                    .assign(Expr::ident(CHANGES).member(name.as_str()))
                    .into_stmt(),
                Expr::ident(&vars[node.index])
                    .member("data")
                    .assign(Expr::ident(name.as_str()))
                    .into_stmt(),
            ],
        })
        .collect()
}

fn detach(table: &NodeTable, vars: &[String]) -> Vec<Stmt> {
    table
        .roots()
        .map(|root| {
            Expr::ident(TARGET)
                .member("removeChild")
                .call(vec![Expr::ident(&vars[root.index])])
                .into_stmt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::split_fragment;
    use crate::index::index_markup;
    use crate::printer::print_stmt;
    use domc_parser::{parse, Span};
    use pretty_assertions::assert_eq;

    fn emit_markup(markup: &str) -> CompiledModule {
        let parsed = parse(markup);
        let fragment = split_fragment(&parsed.document.nodes).unwrap();
        let table = index_markup(&fragment.markup).unwrap();
        emit(&[], &table, &[])
    }

    fn method(module: &CompiledModule, name: &str) -> Vec<String> {
        module
            .methods
            .iter()
            .find(|m| m.name == name)
            .unwrap()
            .body
            .iter()
            .map(print_stmt)
            .collect()
    }

    #[test]
    fn test_create_builds_nodes_then_listeners() {
        let module = emit_markup(r#"<p class="c" on:click={go}>Hi {name}</p>"#);
        assert_eq!(
            method(&module, "create"),
            vec![
                "e0 = document.createElement(\"p\");",
                "e0.setAttribute(\"class\", \"c\");",
                "t1 = document.createTextNode(\"Hi \");",
                "b2 = document.createTextNode(name);",
                "e0.addEventListener(\"click\", go);",
            ]
        );
        assert_eq!(module.locals, vec!["e0", "t1", "b2"]);
    }

    #[test]
    fn test_mount_attaches_grandchildren_first() {
        let module = emit_markup("<div><p>x</p><span></span></div><hr>");
        assert_eq!(
            method(&module, "mount"),
            vec![
                "e1.appendChild(t2);",
                "e0.appendChild(e1);",
                "e0.appendChild(e3);",
                "target.appendChild(e0);",
                "target.appendChild(e4);",
            ]
        );
    }

    #[test]
    fn test_update_touches_only_bindings() {
        let module = emit_markup("<p>a {x} b {y}</p>");
        let update = method(&module, "update");
        assert_eq!(update.len(), 2);
        assert_eq!(
            update[0],
            "if (\"x\" in changes) {\n  x = changes.x;\n  b2.data = x;\n}"
        );
        assert!(update[1].contains("b4.data = y;"));
    }

    #[test]
    fn test_detach_removes_roots_in_order() {
        let module = emit_markup("<p></p><div><i></i></div>");
        assert_eq!(
            method(&module, "detach"),
            vec!["target.removeChild(e0);", "target.removeChild(e1);"]
        );
    }

    #[test]
    fn test_imports_are_hoisted() {
        let statements = vec![
            RestStatement {
                source: "let a = 1;".to_string(),
                placement: Placement::Instance,
                declared: Vec::new(),
                span: Default::default(),
            },
            RestStatement {
                source: "import x from \"x\";".to_string(),
                placement: Placement::Module,
                declared: Vec::new(),
                span: Default::default(),
            },
        ];
        let module = emit(&[], &NodeTable::default(), &statements);
        assert_eq!(module.module_statements, vec!["import x from \"x\";"]);
        assert_eq!(
            module.statements,
            vec![BodyItem::Verbatim("let a = 1;".to_string())]
        );
    }

    #[test]
    fn test_defaults_run_at_declaration_position() {
        let properties = vec![
            Property {
                name: "x".into(),
                default: Some("base + 1".to_string()),
                span: Span::from_offsets(40, 52),
            },
            Property {
                name: "y".into(),
                default: None,
                span: Span::from_offsets(60, 61),
            },
        ];
        let statements = vec![RestStatement {
            source: "const base = 10;".to_string(),
            placement: Placement::Instance,
            declared: vec!["base".into()],
            span: Span::from_offsets(10, 26),
        }];
        let module = emit(&properties, &NodeTable::default(), &statements);

        assert_eq!(module.params, vec!["x", "y"]);
        let body: Vec<String> = module
            .statements
            .iter()
            .map(|item| match item {
                BodyItem::Verbatim(source) => source.clone(),
                BodyItem::Stmt(stmt) => print_stmt(stmt),
            })
            .collect();
        assert_eq!(
            body,
            vec![
                "const base = 10;",
                "if (x === undefined) {\n  x = base + 1;\n}",
            ]
        );
    }
}

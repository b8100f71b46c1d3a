//! Checks bindings and listener handlers against what the script declares.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::error::{CompileError, CompileErrorKind, Warning, WarningKind};
use crate::js::is_valid_identifier;
use crate::node::{NodeTable, Property};
use crate::props::RestStatement;

/// What to do with a `{name}` that names no exported property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnresolvedPolicy {
    /// Fail compilation.
    #[default]
    Error,
    /// Compile, and report a warning.
    Warn,
    /// Compile silently.
    Allow,
}

/// Resolves every binding and listener handler.
///
/// Returns the warnings to report; the first fatal problem is returned as an error.
pub fn resolve_bindings(
    properties: &[Property],
    table: &NodeTable,
    statements: &[RestStatement],
    policy: UnresolvedPolicy,
) -> Result<Vec<Warning>, CompileError> {
    let declared: FxHashSet<&str> = properties.iter().map(|p| p.name.as_str()).collect();
    let mut warnings = Vec::new();

    for (node, name) in table.bindings() {
        // Property names were already accepted by the script parser.
        if declared.contains(name.as_str()) {
            continue;
        }
        if !is_valid_identifier(name) {
            return Err(CompileError::new(
                CompileErrorKind::InvalidBindingName {
                    name: name.to_string(),
                },
                node.span,
            ));
        }
        match policy {
            UnresolvedPolicy::Error => {
                return Err(CompileError::new(
                    CompileErrorKind::UnresolvedBinding {
                        name: name.to_string(),
                        suggestion: suggest(properties, name),
                    },
                    node.span,
                ));
            }
            UnresolvedPolicy::Warn => warnings.push(Warning {
                kind: WarningKind::UnresolvedBinding { name: name.clone() },
                span: node.span,
            }),
            UnresolvedPolicy::Allow => {}
        }
    }

    if policy != UnresolvedPolicy::Allow {
        let script_names: FxHashSet<&str> = statements
            .iter()
            .flat_map(|statement| statement.declared.iter().map(SmolStr::as_str))
            .collect();

        for listener in &table.listeners {
            let handler = listener.handler_expression.as_str();
            if is_valid_identifier(handler)
                && !declared.contains(handler)
                && !script_names.contains(handler)
            {
                warnings.push(Warning {
                    kind: WarningKind::UnresolvedHandler {
                        handler: handler.to_string(),
                    },
                    span: listener.span,
                });
            }
        }
    }

    tracing::debug!(?policy, warnings = warnings.len(), "resolved bindings");
    Ok(warnings)
}

/// A declared property the binding most likely meant.
fn suggest(properties: &[Property], name: &str) -> Option<SmolStr> {
    let trimmed = name.trim();
    properties
        .iter()
        .find(|p| p.name == trimmed)
        .or_else(|| {
            properties
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(trimmed))
        })
        .map(|p| p.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::split_fragment;
    use crate::index::index_markup;
    use crate::props::extract_properties;
    use domc_parser::parse;
    use pretty_assertions::assert_eq;

    fn resolve(source: &str, policy: UnresolvedPolicy) -> Result<Vec<Warning>, CompileError> {
        let parsed = parse(source);
        let fragment = split_fragment(&parsed.document.nodes)?;
        let script = extract_properties(&fragment.script)?;
        let table = index_markup(&fragment.markup)?;
        resolve_bindings(&script.properties, &table, &script.statements, policy)
    }

    fn codes(warnings: &[Warning]) -> Vec<String> {
        warnings.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_declared_bindings_resolve() {
        let source = "<script>export let count = 0;</script><p>{count}</p>";
        assert_eq!(resolve(source, UnresolvedPolicy::Error).unwrap(), vec![]);
    }

    #[test]
    fn test_non_ascii_property_names_resolve() {
        let source = "<script>export let café = 1;</script><p>{café}</p>";
        for policy in [UnresolvedPolicy::Error, UnresolvedPolicy::Allow] {
            assert_eq!(resolve(source, policy).unwrap(), vec![]);
        }

        let output = resolve("<p>{naïve}</p>", UnresolvedPolicy::Allow).unwrap();
        assert_eq!(output, vec![]);
    }

    #[test]
    fn test_unresolved_binding_per_policy() {
        let source = "<script>export let count = 0;</script><p>{Count}</p>";

        let error = resolve(source, UnresolvedPolicy::Error).unwrap_err();
        assert_eq!(
            error.kind,
            CompileErrorKind::UnresolvedBinding {
                name: "Count".to_string(),
                suggestion: Some(SmolStr::new("count")),
            }
        );

        let warnings = resolve(source, UnresolvedPolicy::Warn).unwrap();
        assert_eq!(
            codes(&warnings),
            vec!["`{Count}` does not refer to an exported property"]
        );

        assert_eq!(resolve(source, UnresolvedPolicy::Allow).unwrap(), vec![]);
    }

    #[test]
    fn test_invalid_names_fail_under_every_policy() {
        for policy in [
            UnresolvedPolicy::Error,
            UnresolvedPolicy::Warn,
            UnresolvedPolicy::Allow,
        ] {
            let error = resolve("<script>export let count;</script><p>{ count }</p>", policy)
                .unwrap_err();
            assert_eq!(
                error.kind,
                CompileErrorKind::InvalidBindingName {
                    name: " count ".to_string()
                }
            );
            assert!(resolve("<p>{}</p>", policy).is_err());
        }
    }

    #[test]
    fn test_handlers_resolve_against_script_names() {
        let source = r#"<script>
  import { log } from "./log.js";
  export let count = 0;
  function increment() { count += 1; }
</script>
<button on:click={increment} on:focus={log} on:blur={missing} on:dblclick="count = 0">{count}</button>"#;

        let warnings = resolve(source, UnresolvedPolicy::Error).unwrap();
        assert_eq!(
            codes(&warnings),
            vec!["handler `missing` is not declared in the script block"]
        );
        assert_eq!(resolve(source, UnresolvedPolicy::Allow).unwrap(), vec![]);
    }
}

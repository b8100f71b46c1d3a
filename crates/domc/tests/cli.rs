//! Runs the `domc` binary against fixture components.

use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn domc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_domc"))
        .args(args)
        .output()
        .expect("failed to run domc")
}

#[derive(Debug, Deserialize)]
struct JsonDiagnostic {
    #[serde(rename = "type")]
    diagnostic_type: String,
    start: JsonPosition,
    message: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct JsonPosition {
    line: u32,
    column: u32,
}

fn json_diagnostics(stderr: &[u8]) -> Vec<JsonDiagnostic> {
    String::from_utf8_lossy(stderr)
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("invalid diagnostic JSON"))
        .collect()
}

#[test]
fn compiles_counter_to_stdout() {
    let path = fixture("Counter.domc");
    let output = domc(&[path.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("export default function component(target, props) {\n"));
    assert!(stdout.contains("  let { count } = props;\n"));
    assert!(stdout.contains("  if (count === undefined) {\n    count = 0;\n  }\n"));
    assert!(stdout.contains("e0.addEventListener(\"click\", increment);"));
    assert!(stdout.contains("b2.data = count;"));
}

#[test]
fn emits_node_table_as_json() {
    let path = fixture("Counter.domc");
    let output = domc(&[path.to_str().unwrap(), "--emit", "nodes"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["properties"][0]["name"], "count");
    assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(json["listeners"][0]["handlerExpression"], "increment");
}

#[test]
fn unresolved_binding_fails_without_stdout() {
    let path = fixture("Typo.domc");
    let output = domc(&[path.to_str().unwrap(), "--diagnostics", "json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let diagnostics = json_diagnostics(&output.stderr);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].diagnostic_type, "error");
    assert_eq!(diagnostics[0].code, "domc::structural-input");
    assert_eq!(
        (diagnostics[0].start.line, diagnostics[0].start.column),
        (5, 4)
    );
}

#[test]
fn unresolved_binding_can_be_downgraded() {
    let path = fixture("Typo.domc");
    let output = domc(&[
        path.to_str().unwrap(),
        "--unresolved",
        "warn",
        "--diagnostics",
        "json",
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("b1.data = cuont;"));
    let diagnostics = json_diagnostics(&output.stderr);
    assert_eq!(diagnostics[0].diagnostic_type, "warning");
    assert_eq!(diagnostics[0].code, "domc::unresolved-binding");
}

#[test]
fn interpolation_errors_render_with_source() {
    let path = fixture("Unterminated.domc");
    let output = domc(&[path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("domc::interpolation-syntax"));
    assert!(stderr.contains("unterminated interpolation"));
}

#[test]
fn missing_file_is_an_error() {
    let output = domc(&["does-not-exist.domc"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

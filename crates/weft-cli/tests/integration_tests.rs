//! Integration tests for the weft CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut command = Command::cargo_bin("weft").unwrap();
    command.env_remove("RUST_LOG").env_remove("NO_COLOR");
    command
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_parse_prints_tree() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "main.weft", "if x == 1 { }");

    cli()
        .current_dir(temp_dir.path())
        .args(["parse", "--entry", "stmt"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("IfStmt@0..13\n"))
        .stdout(predicate::str::contains("Operator@5..7 \"==\""));
}

#[test]
fn test_parse_reports_errors() {
    let temp_dir = TempDir::new().unwrap();
    let file = write(temp_dir.path(), "broken.weft", "if x == 1 {");

    cli()
        .current_dir(temp_dir.path())
        .args(["parse", "--no-color", "broken.weft"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: expected '}' to end code block"))
        .stderr(predicate::str::contains("broken.weft:1:12"))
        .stderr(predicate::str::contains("1 error, 0 warnings"));
    assert!(file.exists());
}

#[test]
fn test_parse_json_output() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "warn.weft", "let a = 1;\n");

    let output = cli()
        .current_dir(temp_dir.path())
        .args(["parse", "--format", "json", "warn.weft"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entry"], "source-file");
    assert_eq!(report["root"], "SourceFile");
    assert_eq!(report["diagnostics"][0]["severity"], "warning");
    assert_eq!(report["diagnostics"][0]["message"], "trailing ';' is redundant");
}

#[test]
fn test_parse_unknown_entry() {
    cli()
        .args(["parse", "--entry", "statement", "x.weft"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entry point 'statement'"));
}

#[test]
fn test_build_splices_fragments() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "run.tmpl", "func run() {\n    ${body}\n}\n");
    write(temp_dir.path(), "body.weft", "if ready {\n  go()\n}\n");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "run.tmpl", "--as", "function-decl"])
        .args(["--fragment", "body=body.weft"])
        .assert()
        .success()
        .stdout("func run() {\n    if ready {\n      go()\n    }\n}\n");
}

#[test]
fn test_build_fragment_with_trailing_comment() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "run.tmpl", "func run() {\n    ${body}\n}\n");
    write(temp_dir.path(), "body.weft", "go() // start\n");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "run.tmpl", "--as", "function-decl"])
        .args(["--fragment", "body=body.weft"])
        .assert()
        .success()
        .stdout("func run() {\n    go() // start\n}\n");
}

#[test]
fn test_build_tree_output() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "cond.tmpl", "if ${cond} { }");
    write(temp_dir.path(), "cond.weft", "a && b");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "cond.tmpl", "--as", "if-stmt", "--tree"])
        .args(["--fragment", "cond=cond.weft"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("IfStmt@0..14\n"))
        .stdout(predicate::str::contains("InfixOperatorExpr@3..9"));
}

#[test]
fn test_build_type_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "ret.tmpl", "return 1");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "ret.tmpl", "--as", "if-stmt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "expected to produce a IfStmt but produced a ReturnStmt",
        ));
}

#[test]
fn test_build_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "open.tmpl", "while ${cond} {");
    write(temp_dir.path(), "cond.weft", "x");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "open.tmpl", "--as", "stmt", "--fragment", "cond=cond.weft"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error: expected '}' to end code block"))
        .stderr(predicate::str::contains("open.tmpl:1:10"));
}

#[test]
fn test_build_unknown_fragment() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "t.tmpl", "return ${value}");

    cli()
        .current_dir(temp_dir.path())
        .args(["build", "t.tmpl", "--as", "stmt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown fragment 'value'"));
}

#[test]
fn test_build_invalid_fragment_argument() {
    cli()
        .args(["build", "t.tmpl", "--fragment", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected 'name=path'"));
}

#[test]
fn test_config_discovered_from_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        ".weftrc.json",
        r#"{
            // keep nesting shallow
            "parser": { "maxNestingDepth": 3 },
        }"#,
    );
    write(temp_dir.path(), "deep.weft", "((((((x))))))");

    cli()
        .current_dir(temp_dir.path())
        .args(["parse", "--entry", "expr", "deep.weft"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nesting exceeds the maximum depth of 3"));
}

#[test]
fn test_config_show() {
    let temp_dir = TempDir::new().unwrap();
    let config = write(
        temp_dir.path(),
        "custom.toml",
        "[diagnostics]\ncontextLines = 5\n",
    );

    cli()
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"contextLines\": 5"))
        .stdout(predicate::str::contains("\"maxNestingDepth\": 256"));
}

#[test]
fn test_config_color_never_is_kept() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        ".weftrc.json",
        r#"{ "diagnostics": { "color": "never" } }"#,
    );

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"color\": \"never\""));
}

#[test]
fn test_config_color_unset_becomes_auto() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"color\": \"auto\""));

    cli()
        .current_dir(temp_dir.path())
        .args(["--no-color", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"color\": \"never\""));
}

#[test]
fn test_config_missing_file() {
    cli()
        .args(["config", "show", "--config", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_config_schema() {
    cli()
        .args(["config", "schema"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maxNestingDepth"))
        .stdout(predicate::str::contains("contextLines"));
}

//! CLI integration tests for `tiger tokens` / `tiger parse`.
//!
//! These tests invoke the compiled binary to verify end-to-end behavior.

use std::path::PathBuf;
use std::process::{Command, Output};

fn tiger_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tiger-cli"))
}

/// Writes `src` to a fresh temp file. The directory guard must outlive the run.
fn source_file(src: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = dir.path().join("input.tig");
    std::fs::write(&file, src).expect("write source");
    (dir, file)
}

fn run(args: &[&str], src: &str) -> Output {
    let (_dir, file) = source_file(src);
    let mut cmd = tiger_bin();
    cmd.args(&args[..1]).arg(&file).args(&args[1..]);
    cmd.output().expect("run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn tokens_text() {
    let output = run(&["tokens"], "var x := 1 /* c */\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_owned).collect();
    assert_eq!(
        lines,
        vec![
            "VAR(var)",
            "ID(x)",
            "ASSIGN(:=)",
            "NUM(1)",
            "COMMENT(/* c */)",
            "EOL(",
            ")"
        ]
    );
}

#[test]
fn tokens_json() {
    let output = run(&["tokens", "--format", "json"], "let x");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["tag"], "LET");
    assert_eq!(rows[0]["start"], 0);
    assert_eq!(rows[0]["end"], 3);
    assert_eq!(rows[1]["tag"], "ID");
    assert_eq!(rows[1]["text"], "x");
    assert!(rows[1].get("error").is_none());
}

#[test]
fn tokens_json_reports_invalid_tokens() {
    let output = run(&["tokens", "--format", "json"], "a # b");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let rows: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(rows[1]["tag"], "INVALID");
    let error = rows[1]["error"].as_str().expect("error message");
    assert!(error.contains("invalid character"), "got: {error}");
}

#[test]
fn parse_dump() {
    let output = run(&["parse"], "if 1 then 2 else 3");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "IfExpr(\n  IntExpr(1)\n  IntExpr(2)\n  IntExpr(3)\n)\n"
    );
}

#[test]
fn parse_shaped_dump() {
    let output = run(&["parse", "--shape"], "1 + 2 * 3");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("BinaryExpr(\n  Op(+)\n  IntExpr(1)\n"), "got: {out}");
}

#[test]
fn parse_json() {
    let output = run(&["parse", "--format", "json"], "42");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let ast: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(ast["Expr"]["Int"], 42);
}

#[test]
fn parse_debug() {
    let output = run(&["parse", "--format", "debug"], "nil");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Nil"));
}

#[test]
fn parse_empty_source() {
    let output = run(&["parse"], "/* nothing here */\n");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn syntax_error_exits_nonzero() {
    let output = run(&["parse"], "if 1 2");
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("failed to parse"), "stderr: {err}");
    assert!(err.contains("expected THEN, got NUM"), "stderr: {err}");
}

#[test]
fn lexical_error_exits_nonzero() {
    let output = run(&["parse"], "1 # 2");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Lexer error"));
}

#[test]
fn max_depth_flag() {
    let src = "((((((1))))))";
    let output = run(&["parse", "--max-depth", "4"], src);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("nesting depth limit of 4"),
        "stderr: {}",
        stderr(&output)
    );

    let output = run(&["parse", "--max-depth", "16"], src);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn shape_rejects_chained_comparison() {
    let output = run(&["parse", "--shape"], "a < b < c");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not associative"));

    // without shaping the flat chain is accepted
    let output = run(&["parse"], "a < b < c");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn missing_file() {
    let output = tiger_bin()
        .args(["parse", "/nonexistent/input.tig"])
        .output()
        .expect("run binary");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read"));
}

#[test]
fn oversized_file_is_rejected() {
    let src = format!("/*{}*/", "x".repeat(1_000_001));
    let output = run(&["parse"], &src);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("exceeds 1MB limit"));
}

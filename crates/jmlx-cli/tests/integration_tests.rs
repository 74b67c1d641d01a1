//! Integration tests for the jmlx CLI
//!
//! These tests run the binary end-to-end on temporary files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const COUNTER: &str = "public class Counter {
    // current value
    private int count;

    //@ requires count < 10;
    public void increment() {
        count++;
        //+ESC@ assert count > 0;
    }
}
";

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("jmlx").unwrap()
}

/// A temporary directory holding `Counter.java`; commands run inside it
fn project(source: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Counter.java"), source).unwrap();
    temp_dir
}

#[test]
fn help_lists_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("print"))
        .stdout(predicate::str::contains("sanitize"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn print_keeps_comments_in_place() {
    let dir = project(COUNTER);
    cli()
        .current_dir(dir.path())
        .args(["print", "Counter.java", "--indent", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  // current value\n  private int count;"))
        .stdout(predicate::str::contains("  //@ requires count < 10;\n  public void increment() {"))
        // inactive without --jml-key, so it stays a comment
        .stdout(predicate::str::contains("// +ESC@ assert count > 0;"));
}

#[test]
fn print_activates_keyed_comments() {
    let dir = project(COUNTER);
    cli()
        .current_dir(dir.path())
        .args(["print", "Counter.java", "--jml-key", "esc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("//@ assert count > 0;"));
}

#[test]
fn print_without_comments() {
    let dir = project(COUNTER);
    cli()
        .current_dir(dir.path())
        .args(["print", "Counter.java", "--no-comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("current value").not());
}

#[test]
fn config_file_sets_indentation() {
    let dir = project(COUNTER);
    fs::write(dir.path().join(".jmlx.toml"), "[printer]\nindentSize = 3\n").unwrap();
    cli()
        .current_dir(dir.path())
        .args(["print", "Counter.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n   private int count;"));
}

#[test]
fn sanitize_blanks_comment_syntax() {
    let dir = project(COUNTER);
    cli()
        .current_dir(dir.path())
        .args(["sanitize", "Counter.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("        requires count < 10;"))
        .stdout(predicate::str::contains("assert").not());
}

#[test]
fn tokens_split_right_angles() {
    let dir = project("class A { List<List<String>> xs; }");
    cli()
        .current_dir(dir.path())
        .args(["tokens", "Counter.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:27-1:27\tGt\t\">\""))
        .stdout(predicate::str::contains("1:28-1:28\tGt\t\">\""));
}

#[test]
fn tokens_as_json() {
    let dir = project("class A {}");
    let output = cli()
        .current_dir(dir.path())
        .args(["tokens", "--json", "Counter.java"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens = tokens.as_array().unwrap();
    assert_eq!(tokens[0]["text"], "class");
    assert_eq!(tokens[0]["range"]["begin"]["column"], 1);
}

#[test]
fn check_reports_success() {
    let dir = project(COUNTER);
    cli()
        .current_dir(dir.path())
        .args(["check", "Counter.java"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok      Counter.java"));
}

#[test]
fn check_fails_on_parse_errors() {
    let dir = project("class A { int ; }");
    cli()
        .current_dir(dir.path())
        .args(["check", "Counter.java"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED  Counter.java"))
        .stdout(predicate::str::contains("Parse error"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    cli()
        .current_dir(dir.path())
        .args(["print", "Nope.java"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read Nope.java"));
}

//! Extract subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/javadoc_complex.java";

#[test]
fn test_extract_fixture_regions_with_positions() {
    cargo_bin_cmd!("docprose")
        .args(["extract", FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{FIXTURE}:3:6: This is a JavaDoc with many of the fancy frills that come with it."
        )))
        .stdout(predicate::str::contains(format!(
            "{FIXTURE}:12:18: these are the arguents passed to the program from the command lin."
        )))
        .stdout(predicate::str::contains(format!(
            "{FIXTURE}:20:6: This doc has a link in it: but not tis"
        )))
        .stdout(predicate::str::contains("sould").not())
        .stdout(predicate::str::contains("<i>").not());
}

#[test]
fn test_extract_stdin() {
    cargo_bin_cmd!("docprose")
        .arg("extract")
        .write_stdin("int x;\n/** Returns the value. */\nint get();")
        .assert()
        .success()
        .stdout(predicate::str::diff("<stdin>:2:5: Returns the value.\n"));
}

#[test]
fn test_extract_json() {
    let output = cargo_bin_cmd!("docprose")
        .args(["extract", "--json", FIXTURE])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0]["section"], "description");
    assert_eq!(records[3]["section"], "@param");
    assert_eq!(records[3]["line"], 12);
    assert_eq!(records[5]["text"], "this is an other test.");
}

#[test]
fn test_extract_check_fails_on_diagnostics() {
    cargo_bin_cmd!("docprose")
        .args(["extract", "--check"])
        .write_stdin("/** Fine. */\n/** See {@link Broken\n */")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Fine."))
        .stderr(predicate::str::contains("unterminated-inline-reference"))
        .stderr(predicate::str::contains("at <stdin>:2:9"));
}

#[test]
fn test_extract_without_check_reports_but_succeeds() {
    cargo_bin_cmd!("docprose")
        .arg("extract")
        .write_stdin("/** never closed")
        .assert()
        .success()
        .stderr(predicate::str::contains("unterminated-comment"))
        .stderr(predicate::str::contains("Found 1 issue(s)"));
}

#[test]
fn test_extract_discovers_config() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("src");
    fs::create_dir_all(&nested).unwrap();
    let test_file = nested.join("A.java");
    fs::write(&test_file, "/** Before {@link Foo the label} after. */").unwrap();
    fs::write(
        temp_dir.path().join(".docprose.toml"),
        "[inline_tags]\nlink = \"label\"\n",
    )
    .unwrap();

    cargo_bin_cmd!("docprose")
        .args(["extract", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Before the label after."));
}

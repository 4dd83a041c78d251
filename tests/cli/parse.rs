//! Parse subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_stdin() {
    cargo_bin_cmd!("docprose")
        .arg("parse")
        .write_stdin("/**\n * Text.\n * @param x the x\n */")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOC_COMMENT"))
        .stdout(predicate::str::contains("DESCRIPTION"))
        .stdout(predicate::str::contains("BLOCK_TAG"))
        .stdout(predicate::str::contains("TAG_ARG"));
}

#[test]
fn test_parse_fixture_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("Main.java");
    fs::copy("tests/fixtures/javadoc_complex.java", &test_file).unwrap();

    cargo_bin_cmd!("docprose")
        .args(["parse", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMENT_OPEN"))
        .stdout(predicate::str::contains("MARKUP@"))
        .stdout(predicate::str::contains("\"<i>\""));
}

#[test]
fn test_parse_reports_malformed_comment() {
    cargo_bin_cmd!("docprose")
        .arg("parse")
        .write_stdin("/** Good. */\n/** never closed")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOC_COMMENT"))
        .stderr(predicate::str::contains("unterminated-comment"));
}

//! Cross-cutting CLI tests (help, version, error handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help() {
    cargo_bin_cmd!("docprose")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Docprose finds /** ... */"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("docprose")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("docprose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("docprose")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_extract_help() {
    cargo_bin_cmd!("docprose")
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Locate every documentation comment"));
}

#[test]
fn test_missing_input_file() {
    cargo_bin_cmd!("docprose")
        .args(["extract", "does/not/exist.java"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_explicit_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "block_elements = 3\n").unwrap();

    cargo_bin_cmd!("docprose")
        .args(["extract", "--config", config_file.to_str().unwrap()])
        .write_stdin("/** Text. */")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

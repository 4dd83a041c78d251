//! Spans subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_spans_show_classification() {
    cargo_bin_cmd!("docprose")
        .arg("spans")
        .write_stdin("class A {\n  /** See {@link Foo} now. */\n}")
        .assert()
        .success()
        .stdout(predicate::str::contains("Comment at 2:3"))
        .stdout(predicate::str::contains("Prose \"See \""))
        .stdout(predicate::str::contains("TagName \"link\""))
        .stdout(predicate::str::contains("TagArg \" Foo\""));
}

#[test]
fn test_spans_mark_malformed_blocks() {
    cargo_bin_cmd!("docprose")
        .arg("spans")
        .write_stdin("/** never\n * closed\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Comment at 1:1"))
        .stdout(predicate::str::contains("(malformed)"));
}

//! CLI integration tests for docprose.
//!
//! These tests execute the compiled binary and verify CLI behavior including:
//! - Subcommand behavior (extract, spans, parse)
//! - Stdin/stdout handling
//! - Exit codes and diagnostics
//! - Config discovery

mod common;
mod extract;
mod parse;
mod spans;

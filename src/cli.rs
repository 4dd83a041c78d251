use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docprose")]
#[command(author, version)]
#[command(about = "Extracts checkable prose from Javadoc-style documentation comments")]
#[command(
    long_about = "Docprose finds /** ... */ documentation comments in source files and extracts \
    the natural-language prose they contain, leaving out continuation markers, block tag names, \
    parameter names, HTML markup and inline {@link ...} references. Each prose passage is printed \
    with its original line and column so a grammar or spell checker can report against the file."
)]
#[command(after_help = "\
EXAMPLES:

    # Extract prose from a file
    docprose extract Main.java

    # Extract from stdin as JSON
    cat Main.java | docprose extract --json

    # Fail if any comment is malformed
    docprose extract --check Main.java

    # Show how every comment line was classified
    docprose spans Main.java

    # Inspect the syntax tree of each comment
    docprose parse Main.java

CONFIGURATION:

Docprose looks for configuration files in this order:
  1. Explicit --config path
  2. docprose.toml or .docprose.toml in current/parent directories
  3. ~/.config/docprose/config.toml (XDG)
  4. Built-in defaults

Example .docprose.toml:

    blank_lines_break_regions = true
    inline_tags_break_regions = false

    [inline_tags]
    link = \"label\"
    summary = \"prose\"")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, docprose will \
        search for .docprose.toml or docprose.toml in the input's directory and its parents, \
        then fall back to ~/.config/docprose/config.toml."
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract prose regions from documentation comments
    #[command(
        long_about = "Locate every documentation comment in a source file and print the prose \
        regions extracted from it, one per line, prefixed with the source position of the \
        region's first character. Malformed comments and unterminated markup are reported as \
        diagnostics on stderr."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Print prose regions
    docprose extract Main.java

    # Machine-readable output
    docprose extract --json Main.java

    # Exit with code 1 if any diagnostic was produced
    docprose extract --check Main.java")]
    Extract {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        #[arg(long_help = "Path to the source file to scan. If not provided, reads from stdin.")]
        file: Option<PathBuf>,

        /// Print regions as JSON
        #[arg(long)]
        #[arg(help = "Print regions as a JSON array")]
        json: bool,

        /// Exit with an error when diagnostics were produced
        #[arg(long)]
        #[arg(help = "Exit with code 1 if any comment is malformed")]
        #[arg(
            long_help = "Exit with code 1 if any documentation comment is malformed or contains \
            unterminated markup. Regions from well-formed comments are still printed."
        )]
        check: bool,
    },
    /// Show the classified spans of every comment line
    #[command(
        long_about = "Print every logical line of every documentation comment together with \
        the spans it was split into (prose, markup, tag name, tag argument). Useful for \
        understanding why text was or was not extracted."
    )]
    Spans {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,
    },
    /// Parse and display the syntax tree of each comment for debugging
    #[command(
        long_about = "Parse each documentation comment and display its concrete syntax tree. \
        The tree is lossless: its text is exactly the comment as written."
    )]
    Parse {
        /// Input file (stdin if not provided)
        #[arg(help = "Input file path")]
        file: Option<PathBuf>,
    },
}

pub mod assembler;
pub mod block_tags;
pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod extractor;
pub mod inline_classifier;
pub mod offset_map;
pub mod stripper;
pub mod syntax;

pub use assembler::ProseRegion;
pub use comment::{CommentBlock, doc_comments};
pub use config::Config;
pub use config::ConfigBuilder;
pub use diagnostics::{Diagnostic, MarkupWarning, StructuralError};
pub use extractor::{Extraction, extract};
pub use offset_map::{LineIndex, OffsetMap};
pub use syntax::SyntaxNode;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The outcome of extracting one located comment block.
pub type BlockOutcome<'a> = (CommentBlock<'a>, Result<Extraction<'a>, StructuralError>);

/// Locates every documentation comment in a source file and extracts its
/// prose.
///
/// A broken block does not stop extraction of the others; its structural
/// error is returned in its place.
///
/// # Examples
///
/// ```rust
/// use docprose::{Config, extract_all};
///
/// let source = "/** Adds two numbers. */\nint add(int a, int b);";
/// for (block, outcome) in extract_all(source, &Config::default()) {
///     let extraction = outcome.unwrap();
///     println!("{} at {}", extraction.regions()[0].text(), block.offset);
/// }
/// ```
pub fn extract_all<'a>(source: &'a str, config: &Config) -> Vec<BlockOutcome<'a>> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    doc_comments(source)
        .into_iter()
        .map(|block| {
            let outcome = extract(&block, config);
            (block, outcome)
        })
        .collect()
}

/// Every diagnostic for a source file, in source order.
pub fn collect_diagnostics(source: &str, outcomes: &[BlockOutcome<'_>]) -> Vec<Diagnostic> {
    let index = LineIndex::new(source);
    let mut diagnostics = Vec::new();

    for (block, outcome) in outcomes {
        match outcome {
            Ok(extraction) => diagnostics.extend(extraction.diagnostics(&index)),
            Err(err) => diagnostics.push(Diagnostic::from_structural(err, block.offset, &index)),
        }
    }

    diagnostics
}

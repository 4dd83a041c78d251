//! The extraction pipeline for one comment block.

use crate::assembler::{ProseRegion, assemble};
use crate::block_tags::{SplitComment, Tag, parse_tag_head, split};
use crate::comment::CommentBlock;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, MarkupWarning};
use crate::inline_classifier::{Boundary, InlineClassifier, Span, SpanKind, mark_dangling};
use crate::offset_map::LineIndex;
use crate::stripper::{LogicalLine, StrippedComment, strip};
use crate::syntax::{SyntaxNode, build_tree};

/// Which part of the comment a logical line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Description,
    /// Index into [`Extraction::tags`].
    Tag(usize),
}

/// Everything extracted from one comment block.
///
/// Span and line ranges are relative to the block; prose regions map to
/// absolute source offsets.
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    raw: &'a str,
    block_offset: usize,
    stripped: StrippedComment,
    split: SplitComment,
    spans: Vec<Vec<Span>>,
    regions: Vec<ProseRegion>,
    warnings: Vec<MarkupWarning>,
}

impl<'a> Extraction<'a> {
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn block_offset(&self) -> usize {
        self.block_offset
    }

    pub fn stripped(&self) -> &StrippedComment {
        &self.stripped
    }

    pub fn lines(&self) -> &[LogicalLine] {
        &self.stripped.lines
    }

    /// Classified spans of logical line `idx`, covering its content exactly.
    pub fn spans(&self, idx: usize) -> &[Span] {
        &self.spans[idx]
    }

    pub fn tags(&self) -> &[Tag] {
        &self.split.tags
    }

    pub fn section(&self, idx: usize) -> Section {
        self.split
            .tags
            .iter()
            .position(|tag| tag.lines.contains(&idx))
            .map_or(Section::Description, Section::Tag)
    }

    pub fn regions(&self) -> &[ProseRegion] {
        &self.regions
    }

    pub fn into_regions(self) -> Vec<ProseRegion> {
        self.regions
    }

    pub fn warnings(&self) -> &[MarkupWarning] {
        &self.warnings
    }

    /// Warnings resolved against the whole source file.
    pub fn diagnostics(&self, index: &LineIndex) -> Vec<Diagnostic> {
        self.warnings
            .iter()
            .map(|w| Diagnostic::from_warning(w, self.block_offset, index))
            .collect()
    }

    /// Lossless syntax tree of the block.
    pub fn tree(&self) -> SyntaxNode {
        build_tree(self)
    }
}

/// Extract the prose regions of one comment block.
///
/// A block with broken delimiters yields a [`StructuralError`] and nothing
/// else. Unterminated markup inside the block only produces warnings.
///
/// [`StructuralError`]: crate::diagnostics::StructuralError
pub fn extract<'a>(
    block: &CommentBlock<'a>,
    config: &Config,
) -> Result<Extraction<'a>, crate::diagnostics::StructuralError> {
    let raw = block.text;
    let stripped = strip(raw).inspect_err(|e| {
        log::debug!("Skipping comment block at {}: {}", block.offset, e);
    })?;
    let split = split(raw, &stripped.lines);

    let mut classifier = InlineClassifier::new(config);
    let mut spans: Vec<Vec<Span>> = Vec::with_capacity(stripped.lines.len());

    for line in &stripped.lines {
        if let Some((_, head)) = parse_tag_head(raw, line.content.clone()) {
            let dangling = classifier.close_pending(Boundary::BlockTag);
            apply_dangling(&mut spans, &dangling);

            let mut line_spans = Vec::new();
            push_span(&mut line_spans, SpanKind::Markup, head.marker.clone());
            push_span(&mut line_spans, SpanKind::TagName, head.name.clone());
            push_span(&mut line_spans, SpanKind::Markup, head.gap.clone());
            if let Some(argument) = head.argument.clone() {
                push_span(&mut line_spans, SpanKind::TagArg, argument);
            }
            line_spans.extend(classifier.classify(raw, head.body.clone()));
            spans.push(line_spans);
            continue;
        }

        if line.is_blank(raw) {
            let dangling = classifier.close_pending(Boundary::BlankLine);
            apply_dangling(&mut spans, &dangling);
        }
        spans.push(classifier.classify(raw, line.content.clone()));
    }

    let dangling = classifier.close_pending(Boundary::CommentEnd);
    apply_dangling(&mut spans, &dangling);
    let warnings = classifier.into_warnings();

    let regions = assemble(raw, block.offset, &stripped.lines, &spans, &split, config);
    log::debug!(
        "Extracted {} region(s), {} tag(s), {} warning(s) from block at {}",
        regions.len(),
        split.tags.len(),
        warnings.len(),
        block.offset
    );

    Ok(Extraction {
        raw,
        block_offset: block.offset,
        stripped,
        split,
        spans,
        regions,
        warnings,
    })
}

fn push_span(spans: &mut Vec<Span>, kind: SpanKind, range: std::ops::Range<usize>) {
    if !range.is_empty() {
        spans.push(Span::new(kind, range));
    }
}

fn apply_dangling(spans: &mut [Vec<Span>], dangling: &[std::ops::Range<usize>]) {
    for range in dangling {
        for line_spans in spans.iter_mut() {
            mark_dangling(line_spans, range);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::RegionOrigin;
    use crate::config::{ConfigBuilder, InlineBodyPolicy};
    use crate::diagnostics::{MarkupWarningKind, StructuralError};

    fn texts(raw: &str, config: &Config) -> Vec<String> {
        let block = CommentBlock::new(raw, 0);
        extract(&block, config)
            .unwrap()
            .regions()
            .iter()
            .map(|r| r.text().to_string())
            .collect()
    }

    #[test]
    fn single_sentence_is_one_region() {
        let regions = texts("/** Returns the sum of both values. */", &Config::default());
        assert_eq!(regions, vec!["Returns the sum of both values."]);
    }

    #[test]
    fn wrapped_sentence_is_joined() {
        let raw = "/**\n * Also, the allowed use of the various metadata tags we can attach to methods\n * and classes.\n */";
        let regions = texts(raw, &Config::default());
        assert_eq!(
            regions,
            vec!["Also, the allowed use of the various metadata tags we can attach to methods and classes."]
        );
    }

    #[test]
    fn tag_bodies_are_separate_regions() {
        let raw = "/**\n * Adds.\n * @param a the first\n * @param b the second\n * @return the sum\n */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();
        let regions = extraction.regions();

        let got: Vec<_> = regions.iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["Adds.", "the first", "the second", "the sum"]);
        assert_eq!(regions[0].origin, RegionOrigin::Description);
        assert_eq!(
            regions[2].origin,
            RegionOrigin::Tag {
                index: 1,
                name: "param".into()
            }
        );
        assert_eq!(regions[3].anchor.ordinal, 3);
    }

    #[test]
    fn unterminated_block_is_a_structural_error() {
        let block = CommentBlock::new("/**\n * Never closed.\n", 40);
        let err = extract(&block, &Config::default()).unwrap_err();
        assert_eq!(err, StructuralError::Unterminated { opened_at: 0 });
    }

    #[test]
    fn unterminated_reference_is_excluded_with_warning() {
        let raw = "/**\n * Good text here.\n * See {@link Foo\n * @return the value\n */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let got: Vec<_> = extraction.regions().iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["Good text here. See", "the value"]);
        assert_eq!(extraction.warnings().len(), 1);
        assert_eq!(
            extraction.warnings()[0].kind,
            MarkupWarningKind::UnterminatedInlineReference
        );
    }

    #[test]
    fn unterminated_summary_body_is_reclassified_at_blank_line() {
        let raw = "/**\n * {@summary first line\n * second line\n *\n * After.\n */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let got: Vec<_> = extraction.regions().iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["After."]);
        for idx in 0..extraction.lines().len() {
            for span in extraction.spans(idx) {
                assert!(
                    span.kind != SpanKind::Prose || span.text(raw).trim().is_empty() || idx == 4,
                    "{:?}",
                    span
                );
            }
        }
    }

    #[test]
    fn blank_lines_can_join_paragraphs() {
        let raw = "/**\n * First.\n *\n * Second.\n */";
        let config = ConfigBuilder::default()
            .blank_lines_break_regions(false)
            .build();
        assert_eq!(texts(raw, &config), vec!["First. Second."]);
        assert_eq!(texts(raw, &Config::default()), vec!["First.", "Second."]);
    }

    #[test]
    fn inline_references_can_break_regions() {
        let raw = "/** Before {@link X} after. */";
        let config = ConfigBuilder::default()
            .inline_tags_break_regions(true)
            .build();
        assert_eq!(texts(raw, &config), vec!["Before", "after."]);
        assert_eq!(texts(raw, &Config::default()), vec!["Before after."]);

        // A prose body stays apart from the text after the reference.
        let raw = "/** A {@summary B} C */";
        assert_eq!(texts(raw, &config), vec!["A", "B", "C"]);
        assert_eq!(texts(raw, &Config::default()), vec!["A B C"]);
    }

    #[test]
    fn label_target_with_parameters_is_excluded() {
        let config = ConfigBuilder::default()
            .inline_tag("link", InlineBodyPolicy::Label)
            .build();
        let raw = "/** See {@link #m(int, String) the method} now */";
        assert_eq!(texts(raw, &config), vec!["See the method now"]);
    }

    #[test]
    fn html_tag_open_at_blank_line_warns() {
        let raw = "/** x <a href=\"q\n *\n * y */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let got: Vec<_> = extraction.regions().iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["x", "y"]);
        assert_eq!(extraction.warnings().len(), 1);
        let warning = &extraction.warnings()[0];
        assert_eq!(warning.kind, MarkupWarningKind::UnterminatedHtmlTag);
        assert_eq!(&raw[warning.range.clone()], "<a href=\"q");
        assert!(got.iter().all(|text| !text.contains("href")));
    }

    #[test]
    fn html_tag_open_at_comment_end_warns() {
        let raw = "/** See <a href=\"q*/";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let got: Vec<_> = extraction.regions().iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["See"]);
        assert_eq!(extraction.warnings().len(), 1);
        let warning = &extraction.warnings()[0];
        assert_eq!(warning.kind, MarkupWarningKind::UnterminatedHtmlTag);
        assert_eq!(&raw[warning.range.clone()], "<a href=\"q");
    }

    #[test]
    fn verbatim_open_at_tag_line_warns() {
        let raw = "/**\n * Example: <pre>\n * int x;\n * @return the value\n */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let got: Vec<_> = extraction.regions().iter().map(|r| r.text()).collect();
        assert_eq!(got, vec!["Example:", "the value"]);
        assert_eq!(extraction.warnings().len(), 1);
        let warning = &extraction.warnings()[0];
        assert_eq!(warning.kind, MarkupWarningKind::UnterminatedVerbatimElement);
        assert_eq!(&raw[warning.range.clone()], "<pre>\n * int x;");
        assert!(got.iter().all(|text| !text.contains("int x")));
    }

    #[test]
    fn sections_are_reported_per_line() {
        let raw = "/**\n * Text.\n * @param x the x\n *   more\n */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        assert_eq!(extraction.section(1), Section::Description);
        assert_eq!(extraction.section(2), Section::Tag(0));
        assert_eq!(extraction.section(3), Section::Tag(0));
    }

    #[test]
    fn tag_line_spans() {
        let raw = "/** @param count how many */";
        let block = CommentBlock::new(raw, 0);
        let extraction = extract(&block, &Config::default()).unwrap();

        let spans: Vec<_> = extraction
            .spans(0)
            .iter()
            .map(|s| (s.kind, s.text(raw)))
            .collect();
        assert_eq!(
            spans,
            vec![
                (SpanKind::Markup, "@"),
                (SpanKind::TagName, "param"),
                (SpanKind::Markup, " "),
                (SpanKind::TagArg, "count"),
                (SpanKind::Prose, " how many "),
            ]
        );
    }
}

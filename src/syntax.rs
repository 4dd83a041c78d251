//! Syntax kinds and the lossless CST of a documentation comment.

use std::ops::Range;

use rowan::{GreenNodeBuilder, Language};

use crate::extractor::Extraction;
use crate::inline_classifier::SpanKind;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    COMMENT_OPEN = 0, // /**
    COMMENT_CLOSE,    // */
    LINE_PREFIX,      // indentation, `*` and one space
    NEWLINE,
    PROSE,
    MARKUP,
    TAG_NAME,
    TAG_ARG,
    TRAILING, // whitespace after */

    // Composite nodes
    DOC_COMMENT,
    DESCRIPTION,
    BLOCK_TAG,
    LINE,
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<SpanKind> for SyntaxKind {
    fn from(kind: SpanKind) -> Self {
        match kind {
            SpanKind::Prose => SyntaxKind::PROSE,
            SpanKind::Markup => SyntaxKind::MARKUP,
            SpanKind::TagName => SyntaxKind::TAG_NAME,
            SpanKind::TagArg => SyntaxKind::TAG_ARG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocLanguage {}

impl Language for DocLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::LINE as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<DocLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<DocLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<DocLanguage>;

/// Build the CST of an extracted comment block. The tree's text is exactly
/// the raw block text.
pub fn build_tree(extraction: &Extraction<'_>) -> SyntaxNode {
    let raw = extraction.raw();
    let stripped = extraction.stripped();
    let mut builder = GreenNodeBuilder::new();

    builder.start_node(SyntaxKind::DOC_COMMENT.into());
    token(&mut builder, raw, SyntaxKind::COMMENT_OPEN, stripped.opener.clone());

    let description = lines_before_first_tag(extraction);
    if !description.is_empty() {
        builder.start_node(SyntaxKind::DESCRIPTION.into());
        for idx in description {
            line(&mut builder, extraction, idx);
        }
        builder.finish_node();
    }

    for tag in extraction.tags() {
        builder.start_node(SyntaxKind::BLOCK_TAG.into());
        for idx in tag.lines.clone() {
            line(&mut builder, extraction, idx);
        }
        builder.finish_node();
    }

    token(&mut builder, raw, SyntaxKind::COMMENT_CLOSE, stripped.closer.clone());
    token(&mut builder, raw, SyntaxKind::TRAILING, stripped.trailing.clone());
    builder.finish_node();

    SyntaxNode::new_root(builder.finish())
}

fn lines_before_first_tag(extraction: &Extraction<'_>) -> Range<usize> {
    let end = extraction
        .tags()
        .first()
        .map_or(extraction.lines().len(), |tag| tag.lines.start);
    0..end
}

fn line(builder: &mut GreenNodeBuilder<'_>, extraction: &Extraction<'_>, idx: usize) {
    let raw = extraction.raw();
    let lines = extraction.lines();
    let logical = &lines[idx];

    builder.start_node(SyntaxKind::LINE.into());
    token(builder, raw, SyntaxKind::LINE_PREFIX, logical.prefix.clone());
    for span in extraction.spans(idx) {
        token(builder, raw, span.kind.into(), span.range.clone());
    }

    // The terminator up to the next line; the last line runs into `*/`.
    if let Some(next) = lines.get(idx + 1) {
        token(builder, raw, SyntaxKind::NEWLINE, logical.line.end..next.line.start);
    }
    builder.finish_node();
}

fn token(builder: &mut GreenNodeBuilder<'_>, raw: &str, kind: SyntaxKind, range: Range<usize>) {
    if !range.is_empty() {
        builder.token(kind.into(), &raw[range]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBlock;
    use crate::config::Config;
    use crate::extractor::extract;

    fn tree(raw: &str) -> SyntaxNode {
        let block = CommentBlock::new(raw, 0);
        extract(&block, &Config::default()).unwrap().tree()
    }

    #[test]
    fn tree_is_lossless() {
        let inputs = [
            "/** One line. */",
            "/**\n * Text with <b>bold</b>.\n *\n * @param x the {@code x}\n *   value\n */\n",
            "/**\r\n * Windows.\r\n * @return it\r\n */",
            "/**\n   Unmarked lines\n   still work\n*/",
            "/** {@link Broken */",
        ];

        for input in inputs {
            assert_eq!(tree(input).to_string(), input);
        }
    }

    #[test]
    fn tree_has_description_and_tags() {
        let root = tree("/**\n * Sums.\n * @param a first\n * @return total\n */");
        let kinds: Vec<_> = root.children().map(|n| n.kind()).collect();

        assert_eq!(root.kind(), SyntaxKind::DOC_COMMENT);
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::DESCRIPTION,
                SyntaxKind::BLOCK_TAG,
                SyntaxKind::BLOCK_TAG
            ]
        );
    }

    #[test]
    fn tag_tokens() {
        let root = tree("/** @param count how many */");
        let tag = root
            .children()
            .find(|n| n.kind() == SyntaxKind::BLOCK_TAG)
            .unwrap();
        let tokens: Vec<_> = tag
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| (t.kind(), t.text().to_string()))
            .collect();

        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::LINE_PREFIX, " ".to_string()),
                (SyntaxKind::MARKUP, "@".to_string()),
                (SyntaxKind::TAG_NAME, "param".to_string()),
                (SyntaxKind::MARKUP, " ".to_string()),
                (SyntaxKind::TAG_ARG, "count".to_string()),
                (SyntaxKind::PROSE, " how many ".to_string()),
            ]
        );
    }
}

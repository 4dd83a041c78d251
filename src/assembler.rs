//! Prose region assembly.
//!
//! Walks the classified lines section by section (the description, then
//! each block tag) and merges prose spans into regions. Line breaks inside a
//! region become single spaces. A region ends at a blank line, at a span
//! flagged as breaking, and at the end of its section.

use std::ops::Range;

use crate::block_tags::SplitComment;
use crate::config::Config;
use crate::inline_classifier::{Span, SpanKind};
use crate::offset_map::OffsetMap;
use crate::stripper::LogicalLine;

/// Identifies a region: the absolute offset of its comment block plus its
/// position among that block's regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionAnchor {
    pub block: usize,
    pub ordinal: usize,
}

/// The part of the comment a region was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOrigin {
    Description,
    /// The body of the `index`-th block tag.
    Tag { index: usize, name: String },
}

/// A contiguous passage of prose, ready to be grammar checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProseRegion {
    pub anchor: RegionAnchor,
    pub origin: RegionOrigin,
    text: String,
    map: OffsetMap,
}

impl ProseRegion {
    /// Normalized text: trimmed, with line breaks joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset_map(&self) -> &OffsetMap {
        &self.map
    }

    /// Absolute source offset of a byte position in [`Self::text`].
    pub fn source_offset(&self, pos: usize) -> Option<usize> {
        self.map.to_source(pos)
    }

    /// Absolute source range of a byte range in [`Self::text`].
    pub fn source_range(&self, range: Range<usize>) -> Option<Range<usize>> {
        self.map.range_to_source(range)
    }

    /// Absolute source offset of the first character.
    pub fn source_start(&self) -> usize {
        self.map.to_source(0).unwrap_or_default()
    }
}

/// Build the prose regions of one comment block.
///
/// `spans[i]` are the classified spans of `lines[i]`; `block_offset` is the
/// absolute offset of the block in its source.
pub fn assemble(
    raw: &str,
    block_offset: usize,
    lines: &[LogicalLine],
    spans: &[Vec<Span>],
    split: &SplitComment,
    config: &Config,
) -> Vec<ProseRegion> {
    let mut assembler = Assembler {
        raw,
        block_offset,
        lines,
        spans,
        blank_lines_break: config.blank_lines_break_regions,
        regions: Vec::new(),
    };

    assembler.section(RegionOrigin::Description, split.description.clone());
    for (index, tag) in split.tags.iter().enumerate() {
        let origin = RegionOrigin::Tag {
            index,
            name: tag.kind.name().to_string(),
        };
        assembler.section(origin, tag.lines.clone());
    }

    assembler.regions
}

struct Assembler<'a> {
    raw: &'a str,
    block_offset: usize,
    lines: &'a [LogicalLine],
    spans: &'a [Vec<Span>],
    blank_lines_break: bool,
    regions: Vec<ProseRegion>,
}

impl Assembler<'_> {
    fn section(&mut self, origin: RegionOrigin, line_range: Range<usize>) {
        let (raw, lines, spans) = (self.raw, self.lines, self.spans);
        let mut builder = RegionBuilder::default();

        for idx in line_range {
            let line = &lines[idx];
            if line.is_blank(raw) {
                if self.blank_lines_break {
                    self.flush(&mut builder, &origin);
                }
                continue;
            }

            for span in &spans[idx] {
                if span.breaks_region {
                    self.flush(&mut builder, &origin);
                    continue;
                }
                if span.kind == SpanKind::Prose {
                    builder.append(span.text(raw), self.block_offset + span.range.start);
                }
            }
            builder.end_line(self.block_offset + line.line.end);
        }

        self.flush(&mut builder, &origin);
    }

    fn flush(&mut self, builder: &mut RegionBuilder, origin: &RegionOrigin) {
        let Some((text, map)) = builder.finish() else {
            return;
        };

        let anchor = RegionAnchor {
            block: self.block_offset,
            ordinal: self.regions.len(),
        };
        log::debug!(
            "Prose region {} of block {} ({:?}): {:?}",
            anchor.ordinal,
            anchor.block,
            origin,
            text
        );
        self.regions.push(ProseRegion {
            anchor,
            origin: origin.clone(),
            text,
            map,
        });
    }
}

/// Accumulates one region's text and offset map.
#[derive(Default)]
struct RegionBuilder {
    text: String,
    map: OffsetMap,
    /// Source offset a pending line-break space maps to.
    join_at: Option<usize>,
}

impl RegionBuilder {
    fn append(&mut self, fragment: &str, source_start: usize) {
        let mut fragment = fragment;
        let mut start = source_start;

        // Whitespace on both sides of a junction collapses to one space.
        if self.text.is_empty()
            || self.join_at.is_some()
            || self.text.ends_with(char::is_whitespace)
        {
            let trimmed = fragment.trim_start();
            start += fragment.len() - trimmed.len();
            fragment = trimmed;
        }
        if fragment.is_empty() {
            return;
        }

        if let Some(join_at) = self.join_at.take() {
            self.text.push(' ');
            self.map.push(join_at, 1);
        }
        self.text.push_str(fragment);
        self.map.push(start, fragment.len());
    }

    /// Drop trailing whitespace and remember where the line break began, so a
    /// single joining space can be inserted before the next fragment.
    fn end_line(&mut self, line_end: usize) {
        if self.text.is_empty() || self.join_at.is_some() {
            return;
        }

        let kept = self.text.trim_end().len();
        let join_at = if kept < self.text.len() {
            self.map.to_source(kept).unwrap_or(line_end)
        } else {
            line_end
        };
        self.text.truncate(kept);
        self.map.truncate(kept);
        self.join_at = Some(join_at);
    }

    fn finish(&mut self) -> Option<(String, OffsetMap)> {
        self.join_at = None;
        let kept = self.text.trim_end().len();
        self.text.truncate(kept);
        self.map.truncate(kept);

        if self.text.is_empty() {
            return None;
        }
        Some((
            std::mem::take(&mut self.text),
            std::mem::take(&mut self.map),
        ))
    }
}

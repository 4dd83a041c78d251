//! Comment delimiter stripping.
//!
//! Turns the raw text of a comment block into logical lines: the `/**` and
//! `*/` delimiters are removed, and on every physical line the indentation,
//! one `*` continuation marker and one following space are split off as a
//! prefix. All ranges are byte offsets relative to the start of the block,
//! so later stages can map content positions back to the raw text.

use std::ops::Range;

use crate::comment::{CLOSER, MARKER, OPENER};
use crate::diagnostics::StructuralError;

/// One physical line of a comment with its continuation prefix separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// The physical line, excluding its line terminator.
    pub line: Range<usize>,
    /// Indentation, marker and single space removed from the front.
    pub prefix: Range<usize>,
    /// What is left once the prefix is removed.
    pub content: Range<usize>,
}

impl LogicalLine {
    pub fn content<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.content.clone()]
    }

    /// Offset delta introduced by stripping: `content.start - line.start`.
    pub fn delta(&self) -> usize {
        self.content.start - self.line.start
    }

    /// Blank lines separate paragraphs.
    pub fn is_blank(&self, raw: &str) -> bool {
        self.content(raw).trim().is_empty()
    }
}

/// A comment block split into its delimiters and logical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedComment {
    pub opener: Range<usize>,
    pub lines: Vec<LogicalLine>,
    pub closer: Range<usize>,
    /// Whitespace after the closer.
    pub trailing: Range<usize>,
}

/// Strip delimiters and continuation markers from a raw comment block.
///
/// Fails closed: a block without a closing delimiter is an error and no
/// lines are produced for it.
pub fn strip(raw: &str) -> Result<StrippedComment, StructuralError> {
    if !raw.starts_with(OPENER) {
        return Err(StructuralError::MissingOpener);
    }

    let body_start = OPENER.len();
    let close = raw[body_start..]
        .find(CLOSER)
        .map(|i| body_start + i)
        .ok_or(StructuralError::Unterminated { opened_at: 0 })?;
    let after_close = close + CLOSER.len();

    if let Some(i) = raw[after_close..].find(|c: char| !c.is_whitespace()) {
        return Err(StructuralError::TrailingText {
            at: after_close + i,
        });
    }

    let mut lines = Vec::new();
    let mut line_start = body_start;
    for piece in raw[body_start..close].split('\n') {
        let line_end = line_start + piece.strip_suffix('\r').unwrap_or(piece).len();
        let prefix_len = marker_prefix_len(&raw[line_start..line_end]);

        lines.push(LogicalLine {
            line: line_start..line_end,
            prefix: line_start..line_start + prefix_len,
            content: line_start + prefix_len..line_end,
        });
        line_start += piece.len() + 1;
    }

    log::debug!(
        "Stripped comment of {} bytes into {} logical lines",
        raw.len(),
        lines.len()
    );

    Ok(StrippedComment {
        opener: 0..body_start,
        lines,
        closer: close..after_close,
        trailing: after_close..raw.len(),
    })
}

/// Length of the continuation prefix of `line`: leading whitespace, an
/// optional `*` marker, then at most one space.
pub fn marker_prefix_len(line: &str) -> usize {
    let indent = line.len() - line.trim_start().len();
    let mut len = indent;

    if line[len..].starts_with(MARKER) {
        len += MARKER.len_utf8();
        if line[len..].starts_with(' ') {
            len += 1;
        }
    }

    len
}

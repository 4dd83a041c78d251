//! Errors and warnings produced while extracting prose from a comment.

use std::ops::Range;

use rowan::{TextRange, TextSize};

use crate::offset_map::LineIndex;

/// A comment block whose delimiters are broken. Nothing is extracted from it.
///
/// Offsets are relative to the start of the comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The block does not begin with `/**`.
    MissingOpener,
    /// No `*/` follows the opener.
    Unterminated { opened_at: usize },
    /// Non-whitespace text follows the closing delimiter.
    TrailingText { at: usize },
}

impl std::fmt::Display for StructuralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOpener => write!(f, "comment does not start with `/**`"),
            Self::Unterminated { opened_at } => {
                write!(f, "comment opened at offset {} is never closed", opened_at)
            }
            Self::TrailingText { at } => {
                write!(f, "unexpected text after comment end at offset {}", at)
            }
        }
    }
}

impl std::error::Error for StructuralError {}

impl StructuralError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingOpener => "missing-opener",
            Self::Unterminated { .. } => "unterminated-comment",
            Self::TrailingText { .. } => "trailing-text",
        }
    }

    /// Block-local offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            Self::MissingOpener => 0,
            Self::Unterminated { opened_at } => *opened_at,
            Self::TrailingText { at } => *at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupWarningKind {
    UnterminatedInlineReference,
    UnterminatedHtmlTag,
    UnterminatedVerbatimElement,
}

impl MarkupWarningKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedInlineReference => "unterminated-inline-reference",
            Self::UnterminatedHtmlTag => "unterminated-html-tag",
            Self::UnterminatedVerbatimElement => "unterminated-verbatim-element",
        }
    }
}

/// A markup construct that was still open when it had to be closed.
///
/// Extraction continues; the dangling text is treated as markup. `range`
/// is relative to the start of the comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupWarning {
    pub kind: MarkupWarningKind,
    pub range: Range<usize>,
    pub message: String,
}

impl MarkupWarning {
    pub fn new(kind: MarkupWarningKind, range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub range: TextRange,
}

impl Location {
    /// Location of an absolute byte range in the indexed source.
    pub fn from_range(range: Range<usize>, index: &LineIndex) -> Self {
        let (line, column) = index.line_col(range.start);
        Self {
            line,
            column,
            range: text_range(range),
        }
    }
}

/// A reportable view over structural errors and markup warnings, with
/// absolute positions resolved against the whole source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
    pub code: String,
}

impl Diagnostic {
    pub fn error(location: Location, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
            code: code.into(),
        }
    }

    pub fn warning(
        location: Location,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            message: message.into(),
            code: code.into(),
        }
    }

    /// `block_offset` is the absolute offset of the comment the error came from.
    pub fn from_structural(err: &StructuralError, block_offset: usize, index: &LineIndex) -> Self {
        let at = block_offset + err.offset();
        Self::error(
            Location::from_range(at..at, index),
            err.code(),
            err.to_string(),
        )
    }

    pub fn from_warning(warning: &MarkupWarning, block_offset: usize, index: &LineIndex) -> Self {
        let range = block_offset + warning.range.start..block_offset + warning.range.end;
        Self::warning(
            Location::from_range(range, index),
            warning.kind.code(),
            warning.message.clone(),
        )
    }
}

fn text_range(range: Range<usize>) -> TextRange {
    let clamp = |n: usize| TextSize::try_from(n).unwrap_or(TextSize::from(u32::MAX));
    TextRange::new(clamp(range.start), clamp(range.end))
}

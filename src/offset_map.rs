//! Mapping from normalized prose positions back to source offsets.

/// A contiguous stretch of normalized text copied from contiguous raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    normalized: usize,
    raw: usize,
    len: usize,
}

/// Run-length table from byte positions in a region's normalized text to
/// absolute byte offsets in the source file.
///
/// Built incrementally while the region text is assembled. A joining space
/// inserted at a line break is a one-byte run pointing at the start of the
/// raw whitespace it replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    runs: Vec<Run>,
    len: usize,
}

impl OffsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the normalized text covered so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record that the next `len` normalized bytes were copied from `raw..raw + len`.
    pub fn push(&mut self, raw: usize, len: usize) {
        if len == 0 {
            return;
        }

        if let Some(last) = self.runs.last_mut()
            && last.raw + last.len == raw
        {
            last.len += len;
        } else {
            self.runs.push(Run {
                normalized: self.len,
                raw,
                len,
            });
        }
        self.len += len;
    }

    /// Drop everything at or after normalized position `len`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        while let Some(last) = self.runs.last_mut() {
            if last.normalized >= len {
                self.runs.pop();
            } else {
                last.len = last.len.min(len - last.normalized);
                break;
            }
        }
        self.len = len;
    }

    /// Absolute source offset of normalized position `pos`.
    ///
    /// `pos == len()` maps to just past the last copied byte, so the end of a
    /// range can be mapped too. Returns `None` beyond that.
    pub fn to_source(&self, pos: usize) -> Option<usize> {
        if pos > self.len {
            return None;
        }
        if pos == self.len {
            return self.runs.last().map(|run| run.raw + run.len);
        }

        let idx = self.runs.partition_point(|run| run.normalized <= pos) - 1;
        let run = &self.runs[idx];
        Some(run.raw + (pos - run.normalized))
    }

    /// Absolute source range of a normalized range.
    pub fn range_to_source(&self, range: std::ops::Range<usize>) -> Option<std::ops::Range<usize>> {
        if range.start > range.end {
            return None;
        }
        let start = self.to_source(range.start)?;
        if range.is_empty() {
            return Some(start..start);
        }
        // Map the last byte rather than the end so a range never extends over
        // a skipped marker run.
        let end = self.to_source(range.end - 1)? + 1;
        Some(start..end)
    }
}

/// Byte offset to 1-based line/column lookups over a whole source file.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    text_len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            text_len: text.len(),
        }
    }

    /// 1-based line and column (in bytes) of `offset`, clamped to the text.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text_len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line + 1, offset - self.line_starts[line] + 1)
    }
}

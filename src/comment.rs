//! Comment blocks and a lightweight doc-comment locator.

/// Opening delimiter of a documentation comment.
pub const OPENER: &str = "/**";
/// Closing delimiter of a block comment.
pub const CLOSER: &str = "*/";
/// Per-line continuation marker.
pub const MARKER: char = '*';

/// The raw text of one documentation comment, borrowed from its source file.
///
/// `text` should start with the opening delimiter and end with the closing
/// one. `offset` is the absolute byte offset of `text` within the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentBlock<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> CommentBlock<'a> {
    pub fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    /// Absolute end offset (exclusive) of the block in its source.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Find every `/** ... */` documentation comment in Java-like source.
///
/// String and character literals, `//` line comments and ordinary block
/// comments are skipped. An unclosed doc comment runs to the end of the
/// input; the extractor reports it as unterminated.
pub fn doc_comments(source: &str) -> Vec<CommentBlock<'_>> {
    let bytes = source.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => {
                pos = skip_literal(bytes, pos);
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos = source[pos..]
                    .find('\n')
                    .map(|i| pos + i + 1)
                    .unwrap_or(bytes.len());
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let is_doc = bytes.get(pos + 2) == Some(&b'*') && bytes.get(pos + 3) != Some(&b'/');
                // Search for the closer after the opener so `/**/` and `/*/` are handled.
                let body_start = if is_doc { pos + 3 } else { pos + 2 };
                let end = source[body_start..]
                    .find(CLOSER)
                    .map(|i| body_start + i + CLOSER.len())
                    .unwrap_or(bytes.len());

                if is_doc {
                    log::debug!("Located doc comment at {}..{}", pos, end);
                    blocks.push(CommentBlock::new(&source[pos..end], pos));
                }
                pos = end;
            }
            _ => pos += 1,
        }
    }

    blocks
}

/// Skip a string or character literal starting at `start`, honouring
/// backslash escapes. Literals never span lines.
fn skip_literal(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];

    // Text blocks: """ ... """
    if quote == b'"' && bytes[start..].starts_with(b"\"\"\"") {
        let mut pos = start + 3;
        while pos < bytes.len() {
            if bytes[pos] == b'\\' {
                pos += 2;
                continue;
            }
            if bytes[pos..].starts_with(b"\"\"\"") {
                return pos + 3;
            }
            pos += 1;
        }
        return bytes.len();
    }

    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return pos,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

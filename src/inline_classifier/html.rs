//! HTML tag recognition inside comment text.
//!
//! Only the shape of a tag is recognised: where it starts, its element name
//! and where it ends. Attributes are not validated.

/// The opening of an HTML tag, up to and including the element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct TagStart {
    /// Bytes consumed: `<`, an optional `/` or `!`, and the name.
    pub len: usize,
    /// Lowercased element name. `None` for comments and declarations.
    pub name: Option<String>,
    pub closing: bool,
    pub comment: bool,
}

/// Try to recognise the start of an HTML tag at the beginning of `text`.
///
/// A `<` only opens a tag when directly followed by an ASCII letter, `/`
/// plus a letter, or `!`; `a < b` stays text.
pub(super) fn try_parse_tag_start(text: &str) -> Option<TagStart> {
    let after = text.strip_prefix('<')?;

    if after.starts_with("!--") {
        return Some(TagStart {
            len: 4,
            name: None,
            closing: false,
            comment: true,
        });
    }

    if after.starts_with('!') {
        return Some(TagStart {
            len: 2,
            name: None,
            closing: false,
            comment: false,
        });
    }

    let (closing, name_start) = match after.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, after),
    };

    if !name_start.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let name_len = name_start
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or(name_start.len());

    Some(TagStart {
        len: 1 + usize::from(closing) + name_len,
        name: Some(name_start[..name_len].to_ascii_lowercase()),
        closing,
        comment: false,
    })
}

/// Find the end of a tag whose start has already been consumed.
///
/// Returns the number of bytes up to and including the closing `>` (or
/// `-->` for comments). `quote` carries an open attribute quote across
/// calls so a tag can continue on the next line.
pub(super) fn find_tag_end(text: &str, comment: bool, quote: &mut Option<char>) -> Option<usize> {
    if comment {
        return text.find("-->").map(|i| i + 3);
    }

    for (i, ch) in text.char_indices() {
        match (*quote, ch) {
            (Some(q), c) if c == q => *quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => *quote = Some(ch),
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }

    None
}

//! Block tag splitting.
//!
//! A logical line whose content starts with `@name` opens a block tag. The
//! tag absorbs every following line up to the next tag line or the end of
//! the comment. Lines before the first tag form the description.

use std::ops::Range;

use crate::stripper::LogicalLine;

/// Block tags with a fixed meaning, and whether the first token after the
/// tag name is an identifier (parameter name, exception type, reference
/// target) rather than prose.
const KNOWN_TAGS: &[(&str, bool)] = &[
    ("apiNote", false),
    ("author", false),
    ("deprecated", false),
    ("exception", true),
    ("hidden", false),
    ("implNote", false),
    ("implSpec", false),
    ("param", true),
    ("provides", true),
    ("return", false),
    ("see", true),
    ("serial", false),
    ("serialData", false),
    ("serialField", true),
    ("since", false),
    ("throws", true),
    ("uses", true),
    ("version", false),
];

/// A block tag name resolved against the table of known tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    Known {
        name: &'static str,
        has_positional_arg: bool,
    },
    /// Not in the table. Still a tag: its whole remainder is free text.
    Unknown(String),
}

impl TagKind {
    pub fn resolve(name: &str) -> Self {
        KNOWN_TAGS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|&(name, has_positional_arg)| Self::Known {
                name,
                has_positional_arg,
            })
            .unwrap_or_else(|| Self::Unknown(name.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Known { name, .. } => name,
            Self::Unknown(name) => name,
        }
    }

    pub fn has_positional_arg(&self) -> bool {
        matches!(
            self,
            Self::Known {
                has_positional_arg: true,
                ..
            }
        )
    }
}

/// The structural parts of a tag line. Ranges are block-local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHead {
    /// Indentation and the `@` sign.
    pub marker: Range<usize>,
    pub name: Range<usize>,
    /// Whitespace between the name and the argument.
    pub gap: Range<usize>,
    pub argument: Option<Range<usize>>,
    /// The rest of the line, starting right after the name or argument.
    pub body: Range<usize>,
}

/// One block tag and the logical lines it spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub head: TagHead,
    /// Indices of the logical lines belonging to this tag.
    pub lines: Range<usize>,
    /// Free-text fragments, one per line, in order.
    pub body: Vec<Range<usize>>,
}

impl Tag {
    pub fn argument<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.head.argument.clone().map(|r| &raw[r])
    }

    /// The free-text body with line breaks and surrounding whitespace
    /// collapsed to single spaces.
    pub fn body_text(&self, raw: &str) -> String {
        self.body
            .iter()
            .map(|r| raw[r.clone()].trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A comment split into its description lines and block tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitComment {
    /// Indices of the logical lines before the first tag.
    pub description: Range<usize>,
    pub tags: Vec<Tag>,
}

/// Split logical lines into the description and block tags.
pub fn split(raw: &str, lines: &[LogicalLine]) -> SplitComment {
    let mut description = 0..lines.len();
    let mut tags: Vec<Tag> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if let Some((kind, head)) = parse_tag_head(raw, line.content.clone()) {
            log::debug!("Block tag @{} on logical line {}", kind.name(), idx);
            if tags.is_empty() {
                description.end = idx;
            }
            tags.push(Tag {
                kind,
                body: vec![head.body.clone()],
                head,
                lines: idx..idx + 1,
            });
        } else if let Some(tag) = tags.last_mut() {
            tag.lines.end = idx + 1;
            tag.body.push(line.content.clone());
        }
    }

    SplitComment { description, tags }
}

/// Recognise a tag line: optional indentation, `@`, then a tag name.
pub fn parse_tag_head(raw: &str, content: Range<usize>) -> Option<(TagKind, TagHead)> {
    let text = &raw[content.clone()];
    let trimmed = text.trim_start();
    let at = content.start + (text.len() - trimmed.len());

    let after_at = trimmed.strip_prefix('@')?;
    let name_len = scan_tag_name(after_at).len();
    if name_len == 0 {
        return None;
    }

    let name = at + 1..at + 1 + name_len;
    let kind = TagKind::resolve(&raw[name.clone()]);

    let rest = &raw[name.end..content.end];
    let gap_len = rest.len() - rest.trim_start().len();
    let arg_len = rest[gap_len..]
        .find(char::is_whitespace)
        .unwrap_or(rest.len() - gap_len);

    let head = if kind.has_positional_arg() && arg_len > 0 {
        let argument = name.end + gap_len..name.end + gap_len + arg_len;
        TagHead {
            marker: content.start..at + 1,
            gap: name.end..argument.start,
            body: argument.end..content.end,
            argument: Some(argument),
            name,
        }
    } else {
        TagHead {
            marker: content.start..at + 1,
            gap: name.end..name.end,
            body: name.end..content.end,
            argument: None,
            name,
        }
    };

    Some((kind, head))
}

/// The leading run of tag-name characters in `text`.
pub(crate) fn scan_tag_name(text: &str) -> &str {
    let len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(text.len());
    &text[..len]
}

//! Inline markup classification.
//!
//! Splits the text of logical lines into spans of prose, markup, tag names
//! and tag arguments. The classifier is a single-pass state machine whose
//! state survives line ends, so an HTML tag or inline reference can wrap onto
//! the next line. Nested inline references are kept on an explicit stack.

use std::ops::Range;

use crate::config::{Config, InlineBodyPolicy};
use crate::diagnostics::{MarkupWarning, MarkupWarningKind};

mod html;
mod inline_refs;

use html::{find_tag_end, try_parse_tag_start};
use inline_refs::{scan_opaque_body, scan_target, try_parse_ref_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Prose,
    Markup,
    TagName,
    TagArg,
}

/// A classified, block-local byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub range: Range<usize>,
    /// Set on block-level HTML tags (and, if configured, inline references):
    /// prose before and after this span belongs to different regions.
    pub breaks_region: bool,
}

impl Span {
    pub fn new(kind: SpanKind, range: Range<usize>) -> Self {
        Self {
            kind,
            range,
            breaks_region: false,
        }
    }

    pub fn text<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.range.clone()]
    }
}

/// Where pending constructs are being force-closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    BlankLine,
    BlockTag,
    CommentEnd,
}

#[derive(Debug)]
struct PendingHtml {
    start: usize,
    name: Option<String>,
    closing: bool,
    comment: bool,
    quote: Option<char>,
    breaks: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    /// Everything up to the closing brace is an argument.
    Opaque,
    /// Waiting for the target token of a labelled reference.
    Target,
    /// Body text is classified like surrounding text.
    Text,
}

#[derive(Debug)]
struct RefFrame {
    start: usize,
    name: String,
    depth: usize,
    mode: BodyMode,
}

#[derive(Debug)]
struct Verbatim {
    start: usize,
    name: String,
    depth: usize,
}

pub struct InlineClassifier<'c> {
    config: &'c Config,
    html: Option<PendingHtml>,
    refs: Vec<RefFrame>,
    verbatim: Option<Verbatim>,
    last_end: usize,
    warnings: Vec<MarkupWarning>,
}

impl<'c> InlineClassifier<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            html: None,
            refs: Vec::new(),
            verbatim: None,
            last_end: 0,
            warnings: Vec::new(),
        }
    }

    /// Classify `raw[range]`, continuing any construct left open by the
    /// previous call. The returned spans cover the range exactly.
    pub fn classify(&mut self, raw: &str, range: Range<usize>) -> Vec<Span> {
        let base = range.start;
        let text = &raw[range.clone()];
        let mut sink = SpanSink::default();
        let mut pos = 0;
        let ref_breaks = self.config.inline_tags_break_regions;

        log::trace!("Classifying {:?} at {}", text, base);

        while pos < text.len() {
            let rest = &text[pos..];

            if let Some(mut tag) = self.html.take() {
                match find_tag_end(rest, tag.comment, &mut tag.quote) {
                    Some(len) => {
                        let self_closing = rest[..len - 1].trim_end().ends_with('/');
                        sink.push_breaking(
                            SpanKind::Markup,
                            base + pos..base + pos + len,
                            tag.breaks,
                        );
                        pos += len;
                        self.finish_html(tag, self_closing);
                    }
                    None => {
                        sink.push_breaking(
                            SpanKind::Markup,
                            base + pos..base + text.len(),
                            tag.breaks,
                        );
                        pos = text.len();
                        self.html = Some(tag);
                    }
                }
                continue;
            }

            if let Some(frame) = self.refs.last_mut() {
                match frame.mode {
                    BodyMode::Opaque => {
                        let (len, closed) = scan_opaque_body(rest, &mut frame.depth);
                        sink.push(SpanKind::TagArg, base + pos..base + pos + len);
                        pos += len;
                        if closed {
                            sink.push_breaking(
                                SpanKind::Markup,
                                base + pos..base + pos + 1,
                                ref_breaks,
                            );
                            pos += 1;
                            self.refs.pop();
                        }
                        continue;
                    }
                    BodyMode::Target => {
                        let (len, token) = scan_target(rest);
                        if token > 0 || rest.starts_with(['{', '}']) {
                            frame.mode = BodyMode::Text;
                        }
                        if len > 0 {
                            sink.push(SpanKind::TagArg, base + pos..base + pos + len);
                            pos += len;
                            continue;
                        }
                    }
                    BodyMode::Text => {}
                }
            }

            if rest.starts_with('<')
                && let Some(start) = try_parse_tag_start(rest)
            {
                let breaks = start
                    .name
                    .as_deref()
                    .is_some_and(|name| self.config.is_block_element(name));
                log::trace!("HTML tag {:?} at {}", start.name, base + pos);
                sink.push_breaking(
                    SpanKind::Markup,
                    base + pos..base + pos + start.len,
                    breaks,
                );
                self.html = Some(PendingHtml {
                    start: base + pos,
                    name: start.name,
                    closing: start.closing,
                    comment: start.comment,
                    quote: None,
                    breaks,
                });
                pos += start.len;
                continue;
            }

            if rest.starts_with('{') {
                if let Some(name) = try_parse_ref_start(rest) {
                    log::trace!("Inline reference {{@{}}} at {}", name, base + pos);
                    sink.push_breaking(SpanKind::Markup, base + pos..base + pos + 2, ref_breaks);
                    sink.push(
                        SpanKind::TagName,
                        base + pos + 2..base + pos + 2 + name.len(),
                    );
                    let mode = match self.config.inline_policy(name) {
                        InlineBodyPolicy::Exclude => BodyMode::Opaque,
                        InlineBodyPolicy::Label => BodyMode::Target,
                        InlineBodyPolicy::Prose => BodyMode::Text,
                    };
                    self.refs.push(RefFrame {
                        start: base + pos,
                        name: name.to_string(),
                        depth: 0,
                        mode,
                    });
                    pos += 2 + name.len();
                    continue;
                }
                if let Some(frame) = self.refs.last_mut() {
                    frame.depth += 1;
                }
            } else if rest.starts_with('}')
                && let Some(frame) = self.refs.last_mut()
            {
                if frame.depth == 0 {
                    sink.push_breaking(SpanKind::Markup, base + pos..base + pos + 1, ref_breaks);
                    pos += 1;
                    self.refs.pop();
                    continue;
                }
                frame.depth -= 1;
            }

            // Plain text up to the next character that may start or end markup.
            let len = rest
                .char_indices()
                .skip(1)
                .find(|&(_, c)| matches!(c, '<' | '{' | '}'))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            sink.push(self.text_kind(), base + pos..base + pos + len);
            pos += len;
        }

        self.last_end = range.end;
        sink.spans
    }

    /// Close every construct still open at `boundary`, recording a warning
    /// for each. Returns the block-local ranges of the dangling text, which
    /// must be treated as markup.
    ///
    /// Verbatim elements may contain blank lines, so they survive a
    /// `BlankLine` boundary.
    pub fn close_pending(&mut self, boundary: Boundary) -> Vec<Range<usize>> {
        let at = self.last_end;
        let mut dangling = Vec::new();

        if let Some(tag) = self.html.take() {
            let what = match (&tag.name, tag.comment) {
                (_, true) => "!--",
                (Some(name), false) => name.as_str(),
                (None, false) => "!",
            };
            self.warnings.push(MarkupWarning::new(
                MarkupWarningKind::UnterminatedHtmlTag,
                tag.start..at,
                format!("HTML tag `<{}` is never closed", what),
            ));
            dangling.push(tag.start..at);
        }

        // The outermost reference covers any nested ones.
        if let Some(frame) = self.refs.drain(..).next() {
            self.warnings.push(MarkupWarning::new(
                MarkupWarningKind::UnterminatedInlineReference,
                frame.start..at,
                format!("inline reference `{{@{}` is never closed", frame.name),
            ));
            dangling.push(frame.start..at);
        }

        if boundary != Boundary::BlankLine
            && let Some(verbatim) = self.verbatim.take()
        {
            self.warnings.push(MarkupWarning::new(
                MarkupWarningKind::UnterminatedVerbatimElement,
                verbatim.start..at,
                format!("element `<{}>` is never closed", verbatim.name),
            ));
            dangling.push(verbatim.start..at);
        }

        if !dangling.is_empty() {
            log::debug!("Force-closed {} construct(s) at {:?}", dangling.len(), boundary);
        }
        dangling
    }

    pub fn into_warnings(self) -> Vec<MarkupWarning> {
        self.warnings
    }

    fn text_kind(&self) -> SpanKind {
        if self.verbatim.is_some() {
            SpanKind::Markup
        } else {
            SpanKind::Prose
        }
    }

    fn finish_html(&mut self, tag: PendingHtml, self_closing: bool) {
        if tag.comment {
            return;
        }
        let Some(name) = tag.name else {
            return;
        };
        if !self.config.is_verbatim_element(&name) {
            return;
        }

        match &mut self.verbatim {
            Some(open) if open.name == name => {
                if tag.closing {
                    if open.depth == 0 {
                        self.verbatim = None;
                    } else {
                        open.depth -= 1;
                    }
                } else if !self_closing {
                    open.depth += 1;
                }
            }
            Some(_) => {}
            None => {
                if !tag.closing && !self_closing {
                    self.verbatim = Some(Verbatim {
                        start: tag.start,
                        name,
                        depth: 0,
                    });
                }
            }
        }
    }
}

/// Collects spans, merging adjacent spans of the same kind.
#[derive(Default)]
struct SpanSink {
    spans: Vec<Span>,
}

impl SpanSink {
    fn push(&mut self, kind: SpanKind, range: Range<usize>) {
        self.push_breaking(kind, range, false);
    }

    fn push_breaking(&mut self, kind: SpanKind, range: Range<usize>, breaks: bool) {
        if range.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && last.kind == kind
            && last.range.end == range.start
            && last.breaks_region == breaks
        {
            last.range.end = range.end;
            return;
        }
        self.spans.push(Span {
            kind,
            range,
            breaks_region: breaks,
        });
    }
}

/// Reclassify everything inside `dangling` as markup, splitting spans that
/// straddle its edges.
pub fn mark_dangling(spans: &mut Vec<Span>, dangling: &Range<usize>) {
    let mut out = Vec::with_capacity(spans.len() + 2);

    for span in spans.drain(..) {
        let start = span.range.start.max(dangling.start);
        let end = span.range.end.min(dangling.end);
        if start >= end || span.kind == SpanKind::Markup {
            out.push(span);
            continue;
        }

        if span.range.start < start {
            out.push(Span {
                range: span.range.start..start,
                ..span.clone()
            });
        }
        out.push(Span {
            kind: SpanKind::Markup,
            range: start..end,
            breaks_region: span.breaks_region,
        });
        if end < span.range.end {
            out.push(Span {
                range: end..span.range.end,
                ..span
            });
        }
    }

    *spans = out;
}

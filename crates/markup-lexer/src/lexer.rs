//! The channel-cascade tokenizer.
//!
//! At each cursor position the channels of the active [`GrammarProfile`]
//! list are tried in order. The first channel whose opener matches consumes
//! its construct and emits a node; when none matches, the text fallback
//! consumes at least one character and extends the current text node. Every
//! iteration therefore moves the cursor forward, which bounds the work on
//! any input.

use crate::delimit::{braced_end, is_name_char, line_end, quoted_len, tag_end};
use crate::node::*;
use crate::profile::{Channel, ChannelKind, GrammarProfile};
use crate::tag::parse_tag;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use source_position::{strip_bom, PositionTracker, Span};

/// State kept while inside a raw-text element.
#[derive(Debug, Clone)]
struct RawText {
    script: bool,
    /// Offset of the `</name` ending the element, or the text length.
    /// Nothing consumed in raw mode extends past it.
    end: usize,
    /// Openers that failed to close before `end`.
    exhausted: FxHashSet<&'static str>,
}

/// Tokenizer over one document.
pub struct Tokenizer<'src, 'p> {
    text: &'src str,
    profile: &'p GrammarProfile,
    pos: usize,
    tracker: PositionTracker<'src>,
    nodes: Vec<Node>,
    raw: Option<RawText>,
    /// Openers whose closing delimiter was found missing; later occurrences
    /// read as text.
    exhausted: FxHashSet<&'static str>,
    stop_bytes: [bool; 256],
    raw_stop_bytes: [bool; 256],
}

impl<'src, 'p> Tokenizer<'src, 'p> {
    /// Creates a tokenizer. A leading byte order mark is skipped and does
    /// not count towards positions.
    pub fn new(source: &'src str, profile: &'p GrammarProfile) -> Self {
        let text = strip_bom(source);
        let mut raw_stop_bytes = stop_bytes(profile.raw_channels());
        raw_stop_bytes[b'<' as usize] = true;
        Self {
            text,
            profile,
            pos: 0,
            tracker: PositionTracker::new(text),
            nodes: Vec::new(),
            raw: None,
            exhausted: FxHashSet::default(),
            stop_bytes: stop_bytes(profile.channels()),
            raw_stop_bytes,
        }
    }

    /// Tokenizes the whole document.
    pub fn tokenize(mut self) -> Vec<Node> {
        while self.pos < self.text.len() {
            let before = self.pos;
            self.step();
            if self.pos <= before {
                // Channels always consume; this only guards the invariant.
                self.text_run();
            }
        }
        link_parents(&mut self.nodes);
        self.nodes
    }

    fn rest(&self) -> &'src str {
        &self.text[self.pos..]
    }

    /// The text the next node may cover: up to the raw-text end tag in raw
    /// mode, the rest of the document otherwise.
    fn window(&self) -> &'src str {
        match &self.raw {
            Some(raw) => &self.text[self.pos..raw.end.max(self.pos)],
            None => self.rest(),
        }
    }

    fn is_exhausted(&self, open: &str) -> bool {
        self.exhausted.contains(open)
            || self
                .raw
                .as_ref()
                .is_some_and(|raw| raw.exhausted.contains(open))
    }

    fn mark_exhausted(&mut self, open: &'static str) {
        match &mut self.raw {
            Some(raw) if raw.end < self.text.len() => {
                raw.exhausted.insert(open);
            }
            _ => {
                self.exhausted.insert(open);
            }
        }
    }

    fn step(&mut self) {
        if self.at_raw_end() {
            let end = self.pos + 1 + tag_end(&self.rest().as_bytes()[1..]);
            self.emit_tag(end);
            return;
        }

        let profile = self.profile;
        let channels = if self.raw.is_some() {
            profile.raw_channels()
        } else {
            profile.channels()
        };

        for channel in channels {
            if self.is_exhausted(channel.open) || !channel.matches(self.window()) {
                continue;
            }
            if channel.kind == ChannelKind::LineComment
                && !self.raw.as_ref().is_some_and(|raw| raw.script)
            {
                continue;
            }
            match self.extent(channel) {
                Some(end) => {
                    self.emit(channel, end);
                    return;
                }
                None => self.mark_exhausted(channel.open),
            }
        }

        self.text_run();
    }

    /// Returns true at the `</name` closing the current raw-text element.
    fn at_raw_end(&self) -> bool {
        self.raw
            .as_ref()
            .is_some_and(|raw| raw.end == self.pos && self.pos < self.text.len())
    }

    /// Returns the end offset of the construct a channel opens at the
    /// cursor, or `None` when the channel declines.
    fn extent(&self, channel: &Channel) -> Option<usize> {
        let rest = self.window();
        let body = &rest.as_bytes()[channel.open.len()..];
        let len = match channel.kind {
            ChannelKind::Comment(_)
            | ChannelKind::Directive(_)
            | ChannelKind::Expression(_)
            | ChannelKind::ProcessingInstruction
            | ChannelKind::CData
            | ChannelKind::BlockComment => {
                let body_str = &rest[channel.open.len()..];
                channel.open.len()
                    + body_str
                        .find(channel.close)
                        .map(|idx| idx + channel.close.len())
                        .unwrap_or(body_str.len())
            }
            ChannelKind::BracedExpression(_) => {
                let depth = channel.open.matches('{').count();
                channel.open.len() + braced_end(body, depth)?
            }
            ChannelKind::Element => channel.open.len() + tag_end(body),
            ChannelKind::LineComment => channel.open.len() + line_end(body),
        };
        Some(self.pos + len)
    }

    fn emit(&mut self, channel: &Channel, end: usize) {
        match channel.kind {
            ChannelKind::Element => self.emit_tag(end),
            ChannelKind::CData => self.push_text(end),
            ChannelKind::Comment(kind) => self.emit_comment(kind, end),
            ChannelKind::BlockComment | ChannelKind::LineComment => {
                self.emit_comment(CommentKind::Code, end)
            }
            ChannelKind::Directive(kind) => self.emit_directive(kind, end),
            ChannelKind::Expression(kind) | ChannelKind::BracedExpression(kind) => {
                self.emit_expression(kind, end)
            }
            ChannelKind::ProcessingInstruction => {
                let target = &self.text[self.pos + 2..end];
                let is_xml = target
                    .get(..3)
                    .is_some_and(|t| t.eq_ignore_ascii_case("xml"))
                    && target[3..]
                        .chars()
                        .next()
                        .map_or(true, |c| c.is_whitespace() || c == '?');
                if is_xml {
                    self.emit_directive(DirectiveKind::Markup, end);
                } else {
                    self.emit_expression(ExpressionKind::Php, end);
                }
            }
        }
    }

    /// Consumes `[pos, end)` and returns its code and location.
    fn consume(&mut self, end: usize) -> (String, Location) {
        let start_offset = self.pos;
        let start = self.tracker.advance_to(start_offset);
        let end_pos = self.tracker.advance_to(end);
        self.pos = end;
        (
            self.text[start_offset..end].to_string(),
            Location {
                span: Span::from_offsets(start_offset, end),
                start,
                end: end_pos,
            },
        )
    }

    fn emit_comment(&mut self, kind: CommentKind, end: usize) {
        let (code, location) = self.consume(end);
        self.nodes.push(Node::Comment(CommentNode {
            code,
            location,
            kind,
            parent: None,
        }));
    }

    fn emit_directive(&mut self, kind: DirectiveKind, end: usize) {
        let (code, location) = self.consume(end);
        self.nodes.push(Node::Directive(DirectiveNode {
            code,
            location,
            kind,
            parent: None,
        }));
    }

    fn emit_expression(&mut self, kind: ExpressionKind, end: usize) {
        let (code, location) = self.consume(end);
        self.nodes.push(Node::Expression(ExpressionNode {
            code,
            location,
            kind,
            parent: None,
        }));
    }

    fn emit_tag(&mut self, end: usize) {
        let tag_start = self.pos;
        let parts = parse_tag(&self.text[tag_start..end]);

        // Attribute positions are visited in order so the tracker keeps
        // moving forward.
        let start = self.tracker.advance_to(tag_start);
        let attributes = parts
            .attributes
            .into_iter()
            .map(|raw| Attribute {
                name: SmolStr::new(&raw.name),
                value: raw.value,
                quote: raw.quote,
                line: self.tracker.advance_to(tag_start + raw.start).line,
                span: Span::from_offsets(tag_start + raw.start, tag_start + raw.end),
                synthetic: raw.synthetic,
            })
            .collect();
        let end_pos = self.tracker.advance_to(end);
        self.pos = end;

        let tag = TagNode {
            code: self.text[tag_start..end].to_string(),
            location: Location {
                span: Span::from_offsets(tag_start, end),
                start,
                end: end_pos,
            },
            name: SmolStr::new(&parts.name),
            attributes,
            is_end_element: parts.is_end_element,
            has_self_close: parts.has_self_close,
            parent: None,
        };
        self.switch_mode(&tag);
        self.nodes.push(Node::Tag(tag));
    }

    /// Enters or leaves raw-text mode around `script`, `style` and the like.
    fn switch_mode(&mut self, tag: &TagNode) {
        if tag.is_end_element {
            let start = tag.location.span.range().start;
            if self.raw.as_ref().is_some_and(|raw| raw.end == start) {
                tracing::trace!(element = %tag.name, "leaving raw text");
                self.raw = None;
            }
        } else if !tag.has_self_close && self.profile.is_raw_text_element(&tag.name) {
            tracing::trace!(element = %tag.name, profile = self.profile.name(), "entering raw text");
            self.raw = Some(RawText {
                script: tag.is_named("script"),
                end: raw_text_end(self.text, self.pos, &tag.name),
                exhausted: FxHashSet::default(),
            });
        }
    }

    /// Consumes at least one character, then up to the next position where
    /// a channel could start.
    fn text_run(&mut self) {
        let script = self.raw.as_ref().is_some_and(|raw| raw.script);
        let stops = if self.raw.is_some() {
            &self.raw_stop_bytes
        } else {
            &self.stop_bytes
        };
        let bytes = self.window().as_bytes();

        let mut len = 0;
        while len < bytes.len() {
            let b = bytes[len];
            if len > 0 && stops[b as usize] {
                break;
            }
            if script && (b == b'"' || b == b'\'' || b == b'`') {
                len += 1 + string_len(&bytes[len + 1..], b);
            } else {
                len += utf8_len(b);
            }
        }

        let len = match len.min(bytes.len()) {
            0 => self.rest().chars().next().map_or(0, char::len_utf8),
            len => len,
        };
        self.push_text(self.pos + len);
    }

    /// Appends `[pos, end)` as text, merging with a directly preceding text
    /// node.
    fn push_text(&mut self, end: usize) {
        let start_offset = self.pos;
        let (code, location) = self.consume(end);
        if let Some(Node::Text(last)) = self.nodes.last_mut() {
            if last.location.span.range().end == start_offset {
                last.code.push_str(&code);
                last.location.span.end = location.span.end;
                last.location.end = location.end;
                return;
            }
        }
        self.nodes.push(Node::Text(TextNode {
            code,
            location,
            parent: None,
        }));
    }
}

/// Length of a script string literal after its opening quote, including the
/// closing quote. Single and double quoted strings end at the line end;
/// callers pass bytes already cut at the raw-text end tag.
fn string_len(bytes: &[u8], quote: u8) -> usize {
    let limit = if quote == b'`' {
        bytes.len()
    } else {
        line_end(bytes)
    };
    quoted_len(&bytes[..limit], quote).unwrap_or(limit)
}

/// Length of the UTF-8 sequence starting with `lead`.
fn utf8_len(lead: u8) -> usize {
    match lead {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

fn stop_bytes(channels: &[Channel]) -> [bool; 256] {
    let mut table = [false; 256];
    for channel in channels {
        if let Some(&first) = channel.open.as_bytes().first() {
            table[first as usize] = true;
        }
    }
    table
}

/// Offset of the first `</name` at or after `from` whose name is exactly
/// `element` (ignoring case), or the text length.
fn raw_text_end(text: &str, from: usize, element: &str) -> usize {
    let mut search = from;
    while let Some(idx) = text[search..].find("</") {
        let at = search + idx;
        let after = &text[at + 2..];
        let name_len = after
            .find(|c: char| !is_name_char(c))
            .unwrap_or(after.len());
        if after[..name_len].eq_ignore_ascii_case(element) {
            return at;
        }
        search = at + 2;
    }
    text.len()
}

/// Links every node to its nearest enclosing open start tag.
///
/// Void and self-closing tags never open a scope. An end tag closes the
/// innermost open tag with the same name together with everything opened
/// after it; end tags without a match are left alone.
///
/// Open tags are also indexed by lowercase name as `(stack depth, node)`
/// pairs. Entries invalidated by a truncation are dropped lazily on lookup,
/// so each end tag costs amortized constant time.
fn link_parents(nodes: &mut [Node]) {
    let mut open: Vec<usize> = Vec::new();
    let mut by_name: FxHashMap<SmolStr, Vec<(usize, usize)>> = FxHashMap::default();

    for idx in 0..nodes.len() {
        let parent = open.last().copied().map(NodeId);
        let Node::Tag(tag) = &nodes[idx] else {
            nodes[idx].set_parent(parent);
            continue;
        };
        let key = SmolStr::new(tag.name.to_ascii_lowercase());

        if tag.is_end_element {
            let mut matching = None;
            if let Some(entries) = by_name.get_mut(&key) {
                while let Some(&(depth, open_idx)) = entries.last() {
                    if open.get(depth) == Some(&open_idx) {
                        matching = Some(depth);
                        break;
                    }
                    entries.pop();
                }
            }
            match matching {
                Some(depth) => {
                    let start_parent = nodes[open[depth]].parent();
                    open.truncate(depth);
                    nodes[idx].set_parent(start_parent);
                }
                None => nodes[idx].set_parent(parent),
            }
        } else {
            let opens_scope = !tag.has_self_close && !tag.is_void();
            nodes[idx].set_parent(parent);
            if opens_scope {
                by_name.entry(key).or_default().push((open.len(), idx));
                open.push(idx);
            }
        }
    }
}

//! Grammar profiles: the ordered channel lists the tokenizer tries.
//!
//! At every cursor position the tokenizer tries the channels of the active
//! list in order and lets the first one whose opener matches consume input.
//! Openers sharing a prefix are resolved by order: a longer opener must
//! come before any shorter opener it starts with, which
//! [`GrammarProfile::new`] enforces.

use crate::node::{CommentKind, DirectiveKind, ExpressionKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a channel produces once its opener matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// A comment closed by a fixed delimiter; unterminated comments run to
    /// the end of input.
    Comment(CommentKind),
    /// A directive closed by a fixed delimiter.
    Directive(DirectiveKind),
    /// An expression closed by a fixed delimiter (`<% %>`).
    Expression(ExpressionKind),
    /// A brace-delimited expression (`${}`, `#{}`, `{{}}`). Nested braces
    /// and quoted strings are honoured; when no closing brace exists the
    /// opener is read as text.
    BracedExpression(ExpressionKind),
    /// `<? ?>`: an XML declaration or a PHP block.
    ProcessingInstruction,
    /// `<![CDATA[ ]]>`, emitted as text.
    CData,
    /// A start or end tag.
    Element,
    /// `/* */` inside script or style content.
    BlockComment,
    /// `//` up to the end of the line inside script content.
    LineComment,
}

/// One pattern matcher of a grammar profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub open: &'static str,
    pub close: &'static str,
}

impl Channel {
    pub const fn new(kind: ChannelKind, open: &'static str, close: &'static str) -> Self {
        Self { kind, open, close }
    }

    /// Returns true if this channel's opener starts `rest`.
    pub fn matches(&self, rest: &str) -> bool {
        if !rest.starts_with(self.open) {
            return false;
        }
        match self.kind {
            ChannelKind::Element => starts_tag(&rest[self.open.len()..]),
            _ => true,
        }
    }
}

/// A `<` opens a tag only when a name (or `/` and a name) follows.
fn starts_tag(after_angle: &str) -> bool {
    let after = after_angle.strip_prefix('/').unwrap_or(after_angle);
    after.chars().next().is_some_and(char::is_alphabetic)
}

/// Errors raised when assembling a custom profile.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// A channel can never match because an earlier opener is a prefix of it.
    #[error("channel `{shadowed}` is unreachable behind `{by}`; list longer openers first")]
    Shadowed {
        shadowed: &'static str,
        by: &'static str,
    },

    #[error("channel list `{0}` is empty")]
    Empty(&'static str),
}

/// The channel configuration selected per file kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarProfile {
    name: &'static str,
    channels: Vec<Channel>,
    raw_channels: Vec<Channel>,
    raw_text_elements: Vec<&'static str>,
}

impl GrammarProfile {
    /// Creates a profile from ordered channel lists.
    ///
    /// `raw_channels` apply inside raw-text elements (`script`, `style`),
    /// where markup is not tokenized.
    pub fn new(
        name: &'static str,
        channels: Vec<Channel>,
        raw_channels: Vec<Channel>,
        raw_text_elements: Vec<&'static str>,
    ) -> Result<Self, ProfileError> {
        if channels.is_empty() {
            return Err(ProfileError::Empty(name));
        }
        check_order(&channels)?;
        check_order(&raw_channels)?;
        Ok(Self {
            name,
            channels,
            raw_channels,
            raw_text_elements,
        })
    }

    /// Profile for HTML pages with JSP, PHP, ERB, EL and Angular syntax.
    pub fn markup() -> Self {
        use ChannelKind::*;
        Self {
            name: "markup",
            channels: vec![
                Channel::new(Comment(CommentKind::Template), "<%--", "--%>"),
                Channel::new(Comment(CommentKind::Html), "<!--", "-->"),
                Channel::new(Directive(DirectiveKind::Template), "<%@", "%>"),
                Channel::new(Expression(ExpressionKind::Scriptlet), "<%", "%>"),
                Channel::new(ProcessingInstruction, "<?", "?>"),
                Channel::new(CData, "<![CDATA[", "]]>"),
                Channel::new(Directive(DirectiveKind::Markup), "<!", ">"),
                Channel::new(BracedExpression(ExpressionKind::El), "${", "}"),
                Channel::new(BracedExpression(ExpressionKind::El), "#{", "}"),
                Channel::new(BracedExpression(ExpressionKind::Interpolation), "{{", "}}"),
                Channel::new(Element, "<", ">"),
            ],
            raw_channels: vec![
                Channel::new(Comment(CommentKind::Template), "<%--", "--%>"),
                Channel::new(Directive(DirectiveKind::Template), "<%@", "%>"),
                Channel::new(Expression(ExpressionKind::Scriptlet), "<%", "%>"),
                Channel::new(ProcessingInstruction, "<?", "?>"),
                Channel::new(BracedExpression(ExpressionKind::El), "${", "}"),
                Channel::new(BracedExpression(ExpressionKind::El), "#{", "}"),
                Channel::new(BlockComment, "/*", "*/"),
                Channel::new(LineComment, "//", ""),
            ],
            raw_text_elements: vec!["script", "style"],
        }
    }

    /// Profile for single-file components (`.vue`): a template region with
    /// `{{ }}` interpolation and raw `script`, `style` and custom blocks.
    pub fn component() -> Self {
        use ChannelKind::*;
        Self {
            name: "component",
            channels: vec![
                Channel::new(Comment(CommentKind::Html), "<!--", "-->"),
                Channel::new(Directive(DirectiveKind::Markup), "<!", ">"),
                Channel::new(BracedExpression(ExpressionKind::Interpolation), "{{", "}}"),
                Channel::new(Element, "<", ">"),
            ],
            raw_channels: vec![
                Channel::new(BlockComment, "/*", "*/"),
                Channel::new(LineComment, "//", ""),
            ],
            raw_text_elements: vec!["script", "style", "i18n", "docs"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Channels tried in markup content.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channels tried inside raw-text elements.
    pub fn raw_channels(&self) -> &[Channel] {
        &self.raw_channels
    }

    /// Returns true if the content of `name` is raw text.
    pub fn is_raw_text_element(&self, name: &str) -> bool {
        self.raw_text_elements
            .iter()
            .any(|raw| raw.eq_ignore_ascii_case(name))
    }

    /// Checks that no channel is shadowed by an earlier, shorter opener.
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_order(&self.channels)?;
        check_order(&self.raw_channels)
    }
}

fn check_order(channels: &[Channel]) -> Result<(), ProfileError> {
    for (idx, later) in channels.iter().enumerate() {
        let shadowing = channels[..idx].iter().find(|earlier| {
            earlier.kind != ChannelKind::Element
                && later.open.starts_with(earlier.open)
                && later.open.len() > earlier.open.len()
        });
        if let Some(earlier) = shadowing {
            return Err(ProfileError::Shadowed {
                shadowed: later.open,
                by: earlier.open,
            });
        }
    }
    Ok(())
}

/// Selector for the built-in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProfileKind {
    #[default]
    Markup,
    Component,
}

impl ProfileKind {
    pub fn profile(self) -> GrammarProfile {
        match self {
            ProfileKind::Markup => GrammarProfile::markup(),
            ProfileKind::Component => GrammarProfile::component(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileKind::Markup => "markup",
            ProfileKind::Component => "component",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized profile name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown grammar profile: {0}")]
pub struct UnknownProfile(pub String);

impl FromStr for ProfileKind {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markup" | "html" => Ok(ProfileKind::Markup),
            "component" | "vue" | "sfc" => Ok(ProfileKind::Component),
            _ => Err(UnknownProfile(s.to_string())),
        }
    }
}

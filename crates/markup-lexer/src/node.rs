//! Node and attribute types produced by the tokenizer.
//!
//! The tokenizer output is a flat sequence: structure is only hinted at by
//! [`Node::parent`]. Consumers that need exact nesting rebuild it from the
//! sequence with their own stack.

use smol_str::SmolStr;
use source_position::{LinePos, Span};

/// HTML void elements, which never have content or a closing tag.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
pub fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Index of a node in the tokenizer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub usize);

/// Where a node sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Byte range in the tokenized text.
    pub span: Span,
    /// Position of the first character.
    pub start: LinePos,
    /// Position just after the last character.
    pub end: LinePos,
}

/// The variant of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tag,
    Text,
    Comment,
    Directive,
    Expression,
}

/// One positioned unit of a tokenized template.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// A start or end tag.
    Tag(TagNode),
    /// Character data.
    Text(TextNode),
    /// A markup or code comment.
    Comment(CommentNode),
    /// A doctype, processing instruction or template directive.
    Directive(DirectiveNode),
    /// An embedded expression or scriptlet.
    Expression(ExpressionNode),
}

impl Node {
    /// Returns the variant of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Tag(_) => NodeKind::Tag,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::Directive(_) => NodeKind::Directive,
            Node::Expression(_) => NodeKind::Expression,
        }
    }

    /// Returns the raw source text of this node.
    pub fn code(&self) -> &str {
        match self {
            Node::Tag(n) => &n.code,
            Node::Text(n) => &n.code,
            Node::Comment(n) => &n.code,
            Node::Directive(n) => &n.code,
            Node::Expression(n) => &n.code,
        }
    }

    /// Returns the location of this node.
    pub fn location(&self) -> Location {
        match self {
            Node::Tag(n) => n.location,
            Node::Text(n) => n.location,
            Node::Comment(n) => n.location,
            Node::Directive(n) => n.location,
            Node::Expression(n) => n.location,
        }
    }

    /// Returns the enclosing start tag, if the tokenizer found one.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Tag(n) => n.parent,
            Node::Text(n) => n.parent,
            Node::Comment(n) => n.parent,
            Node::Directive(n) => n.parent,
            Node::Expression(n) => n.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Tag(n) => n.parent = parent,
            Node::Text(n) => n.parent = parent,
            Node::Comment(n) => n.parent = parent,
            Node::Directive(n) => n.parent = parent,
            Node::Expression(n) => n.parent = parent,
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.location().span
    }

    #[inline]
    pub fn start(&self) -> LinePos {
        self.location().start
    }

    #[inline]
    pub fn end(&self) -> LinePos {
        self.location().end
    }

    /// Returns the line the node starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.location().start.line
    }

    /// Returns the tag payload, if this is a tag.
    pub fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

/// A start or end tag.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagNode {
    pub code: String,
    pub location: Location,
    /// The tag name as written, possibly namespace-qualified (`h:form`).
    pub name: SmolStr,
    /// Attributes in source order, including synthetic ones.
    pub attributes: Vec<Attribute>,
    /// Whether the code begins with `</`.
    pub is_end_element: bool,
    /// Whether the code ends with `/>`.
    pub has_self_close: bool,
    pub parent: Option<NodeId>,
}

impl TagNode {
    /// Case-insensitive comparison of the full tag name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the namespace prefix of a qualified name (`h` in `h:form`).
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Returns the local part of a qualified name (`form` in `h:form`).
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Returns true for HTML void elements such as `br` or `img`.
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    /// Looks up an attribute by name, ignoring ASCII case.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| !attr.synthetic && attr.name.eq_ignore_ascii_case(name))
    }

    /// Returns the value of an attribute, if it is present and has one.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|attr| attr.value.as_deref())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Looks up an attribute under any of the binding syntaxes frameworks
    /// use for the same property.
    ///
    /// For `name` this tries, in order: `name`, `[name]`, `attr.name`,
    /// `[attr.name]`, `:name` and `[:name]`.
    pub fn property(&self, name: &str) -> Option<&Attribute> {
        if let Some(attr) = self.attribute(name) {
            return Some(attr);
        }
        [
            format!("[{name}]"),
            format!("attr.{name}"),
            format!("[attr.{name}]"),
            format!(":{name}"),
            format!("[:{name}]"),
        ]
        .iter()
        .find_map(|alias| self.attribute(alias))
    }

    /// Returns the value of [`property`](Self::property).
    pub fn property_value(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|attr| attr.value.as_deref())
    }
}

/// The quote character around an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuoteChar {
    #[default]
    None,
    Single,
    Double,
}

/// A tag attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: SmolStr,
    /// The value without its quotes. `None` for valueless attributes and
    /// for synthetic ones.
    pub value: Option<String>,
    pub quote: QuoteChar,
    /// Line the attribute starts on.
    pub line: u32,
    pub span: Span,
    /// Set for tag fragments embedded in the attribute list
    /// (`<td <c:if test="${x}">class="a"</c:if>>`). The fragment text is
    /// kept as the name.
    pub synthetic: bool,
}

impl Attribute {
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

/// Character data between other nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    pub code: String,
    pub location: Location,
    pub parent: Option<NodeId>,
}

/// The dialect of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentKind {
    /// `<!-- -->`
    Html,
    /// `<%-- --%>`
    Template,
    /// `/* */` or `//` inside script and style content.
    Code,
}

/// A comment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentNode {
    pub code: String,
    pub location: Location,
    pub kind: CommentKind,
    pub parent: Option<NodeId>,
}

impl CommentNode {
    /// Markup-family comments are `<!-- -->` and `<%-- --%>`; the rest are
    /// code-family.
    pub fn is_markup(&self) -> bool {
        matches!(self.kind, CommentKind::Html | CommentKind::Template)
    }
}

/// The dialect of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DirectiveKind {
    /// Markup-native declarations: `<!DOCTYPE ...>`, `<?xml ...?>`.
    Markup,
    /// Template directives: `<%@ page ... %>`.
    Template,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectiveNode {
    pub code: String,
    pub location: Location,
    pub kind: DirectiveKind,
    pub parent: Option<NodeId>,
}

impl DirectiveNode {
    pub fn is_template(&self) -> bool {
        self.kind == DirectiveKind::Template
    }
}

/// The dialect of an embedded expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionKind {
    /// `<% %>`, `<%= %>`, `<%! %>`
    Scriptlet,
    /// `<?php ?>`, `<?= ?>`
    Php,
    /// `${ }` and `#{ }`
    El,
    /// `{{ }}`
    Interpolation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionNode {
    pub code: String,
    pub location: Location,
    pub kind: ExpressionKind,
    pub parent: Option<NodeId>,
}

impl ExpressionNode {
    /// Returns true for expressions whose value is written to the page.
    pub fn is_output(&self) -> bool {
        match self.kind {
            ExpressionKind::Scriptlet => self.code.starts_with("<%="),
            ExpressionKind::Php => self.code.starts_with("<?="),
            ExpressionKind::El | ExpressionKind::Interpolation => true,
        }
    }
}

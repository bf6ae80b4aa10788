//! Lexing of tag interiors into a name and attributes.
//!
//! The tag channel first finds where a tag ends (see
//! [`tag_end`](crate::delimit::tag_end)); the text between the name and the
//! closing `>` is then split with a `logos` lexer into attribute names,
//! `=`, quoted values and embedded tag fragments.

use crate::delimit::{quoted_len, tag_end};
use crate::node::QuoteChar;
use logos::Logos;

/// Tokens inside a tag's attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(skip r"[ \t\r\n\x0C]+")]
pub(crate) enum TagToken {
    /// `=`
    #[token("=")]
    Eq,

    /// A `"`-quoted value; runs to the end of the list when never closed.
    #[token("\"", |lex| skip_quoted(lex, b'"'))]
    DoubleQuoted,

    /// A `'`-quoted value; runs to the end of the list when never closed.
    #[token("'", |lex| skip_quoted(lex, b'\''))]
    SingleQuoted,

    /// A tag fragment inside the attribute list, e.g. `<c:if test="x">`.
    #[token("<", skip_fragment)]
    Fragment,

    /// A stray `>`.
    #[token(">")]
    RAngle,

    /// An attribute name or an unquoted value.
    #[regex(r#"[^ \t\r\n\x0C"'<>=]+"#)]
    Word,
}

fn skip_quoted(lex: &mut logos::Lexer<TagToken>, quote: u8) -> bool {
    let rest = lex.remainder();
    let len = quoted_len(rest.as_bytes(), quote).unwrap_or(rest.len());
    lex.bump(len);
    true
}

fn skip_fragment(lex: &mut logos::Lexer<TagToken>) -> bool {
    let len = tag_end(lex.remainder().as_bytes());
    lex.bump(len);
    true
}

/// An attribute as found by the tag lexer, with offsets relative to the
/// start of the tag code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawAttribute {
    pub name: String,
    pub value: Option<String>,
    pub quote: QuoteChar,
    pub start: usize,
    pub end: usize,
    pub synthetic: bool,
}

/// The parts of a tag's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagParts {
    pub name: String,
    pub is_end_element: bool,
    pub has_self_close: bool,
    pub attributes: Vec<RawAttribute>,
}

/// Splits the code of a tag (`<name attr="v">`, `</name>`) into its parts.
pub(crate) fn parse_tag(code: &str) -> TagParts {
    let is_end_element = code.starts_with("</");
    let has_self_close = code.ends_with("/>");

    let name_start = if is_end_element { 2 } else { 1 }.min(code.len());
    let name_len = code[name_start..]
        .find(|c: char| c.is_whitespace() || matches!(c, '/' | '>' | '<' | '"' | '\'' | '='))
        .unwrap_or(code.len() - name_start);
    let name_end = name_start + name_len;

    let body_end = if has_self_close {
        code.len() - 2
    } else if code.ends_with('>') {
        code.len() - 1
    } else {
        code.len()
    }
    .max(name_end);

    TagParts {
        name: code[name_start..name_end].to_string(),
        is_end_element,
        has_self_close,
        attributes: parse_attributes(&code[name_end..body_end], name_end),
    }
}

/// Splits an attribute list. `base` is the offset of `body` in the tag.
fn parse_attributes(body: &str, base: usize) -> Vec<RawAttribute> {
    let tokens: Vec<(TagToken, std::ops::Range<usize>)> = TagToken::lexer(body)
        .spanned()
        .filter_map(|(token, span)| token.ok().map(|token| (token, span)))
        .collect();

    let mut attributes = Vec::new();
    let mut pending: Option<RawAttribute> = None;
    let mut idx = 0;

    while idx < tokens.len() {
        let (token, span) = (tokens[idx].0, tokens[idx].1.clone());
        let slice = &body[span.clone()];
        idx += 1;

        match token {
            TagToken::Word => {
                // A lone `/` is the remains of `/ >` and carries nothing.
                if slice == "/" {
                    continue;
                }
                attributes.extend(pending.take());
                pending = Some(RawAttribute {
                    name: slice.to_string(),
                    value: None,
                    quote: QuoteChar::None,
                    start: base + span.start,
                    end: base + span.end,
                    synthetic: false,
                });
            }
            TagToken::Eq => {
                let Some(mut attr) = pending.take() else {
                    continue;
                };
                match tokens.get(idx) {
                    Some((
                        value_token @ (TagToken::DoubleQuoted
                        | TagToken::SingleQuoted
                        | TagToken::Word
                        | TagToken::Fragment),
                        value_span,
                    )) => {
                        let raw = &body[value_span.clone()];
                        let (value, quote) = match value_token {
                            TagToken::DoubleQuoted => (unquote(raw, '"'), QuoteChar::Double),
                            TagToken::SingleQuoted => (unquote(raw, '\''), QuoteChar::Single),
                            _ => (raw.to_string(), QuoteChar::None),
                        };
                        attr.value = Some(value);
                        attr.quote = quote;
                        attr.end = base + value_span.end;
                        idx += 1;
                    }
                    _ => {
                        attr.value = Some(String::new());
                        attr.end = base + span.end;
                    }
                }
                attributes.push(attr);
            }
            TagToken::Fragment | TagToken::DoubleQuoted | TagToken::SingleQuoted => {
                attributes.extend(pending.take());
                attributes.push(RawAttribute {
                    name: slice.to_string(),
                    value: None,
                    quote: QuoteChar::None,
                    start: base + span.start,
                    end: base + span.end,
                    synthetic: token == TagToken::Fragment,
                });
            }
            TagToken::RAngle => {}
        }
    }

    attributes.extend(pending);
    attributes
}

/// Strips the opening quote and, when present, the closing one.
fn unquote(raw: &str, quote: char) -> String {
    let inner = raw.strip_prefix(quote).unwrap_or(raw);
    let inner = if inner.len() < raw.len() {
        inner.strip_suffix(quote).unwrap_or(inner)
    } else {
        inner
    };
    inner.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(parts: &TagParts) -> Vec<&str> {
        parts.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    fn values(parts: &TagParts) -> Vec<Option<&str>> {
        parts
            .attributes
            .iter()
            .map(|a| a.value.as_deref())
            .collect()
    }

    #[test]
    fn test_simple_tag() {
        let parts = parse_tag("<a>");
        assert_eq!(parts.name, "a");
        assert!(!parts.is_end_element);
        assert!(!parts.has_self_close);
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_end_tag() {
        let parts = parse_tag("</h:form >");
        assert_eq!(parts.name, "h:form");
        assert!(parts.is_end_element);
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_self_closing_tag() {
        let parts = parse_tag("<br/>");
        assert_eq!(parts.name, "br");
        assert!(parts.has_self_close);
        assert!(parts.attributes.is_empty());
    }

    #[test]
    fn test_attribute_forms() {
        let parts = parse_tag(r#"<input type="text" name='q' size=10 disabled value=>"#);
        assert_eq!(names(&parts), vec!["type", "name", "size", "disabled", "value"]);
        assert_eq!(
            values(&parts),
            vec![Some("text"), Some("q"), Some("10"), None, Some("")]
        );
        let quotes: Vec<_> = parts.attributes.iter().map(|a| a.quote).collect();
        assert_eq!(
            quotes,
            vec![
                QuoteChar::Double,
                QuoteChar::Single,
                QuoteChar::None,
                QuoteChar::None,
                QuoteChar::None
            ]
        );
    }

    #[test]
    fn test_markup_inside_quoted_value_is_literal() {
        let parts = parse_tag(r#"<a title="<b>bold</b>" href='${url}'>"#);
        assert_eq!(
            values(&parts),
            vec![Some("<b>bold</b>"), Some("${url}")]
        );
        assert!(parts.attributes.iter().all(|a| !a.synthetic));
    }

    #[test]
    fn test_embedded_fragments_become_synthetic_attributes() {
        let parts = parse_tag(
            r#"<td id="typeCellHeader"<c:if test='${x=="e"}'>style="display:none;"</c:if>>"#,
        );
        assert_eq!(
            names(&parts),
            vec![
                "id",
                r#"<c:if test='${x=="e"}'>"#,
                "style",
                "</c:if>"
            ]
        );
        assert_eq!(
            values(&parts),
            vec![Some("typeCellHeader"), None, Some("display:none;"), None]
        );
        let synthetic: Vec<_> = parts.attributes.iter().map(|a| a.synthetic).collect();
        assert_eq!(synthetic, vec![false, true, false, true]);
    }

    #[test]
    fn test_unterminated_value_is_kept_whole() {
        let parts = parse_tag(r#"<a title="never closed> more"#);
        assert_eq!(values(&parts), vec![Some("never closed> more")]);
    }

    #[test]
    fn test_escaped_quote_in_value() {
        let parts = parse_tag(r#"<c:out value="say \"hi\""/>"#);
        assert_eq!(values(&parts), vec![Some(r#"say \"hi\""#)]);
        assert!(parts.has_self_close);
    }

    #[test]
    fn test_binding_syntaxes_are_names() {
        let parts = parse_tag(r#"<img [src]="a" :alt="b" @click="c" (load)="d" *ngIf="e">"#);
        assert_eq!(names(&parts), vec!["[src]", ":alt", "@click", "(load)", "*ngIf"]);
    }

    #[test]
    fn test_attribute_offsets() {
        let code = r#"<a  href="x">"#;
        let parts = parse_tag(code);
        let href = &parts.attributes[0];
        assert_eq!(&code[href.start..href.end], r#"href="x""#);
    }

    #[test]
    fn test_unterminated_tag() {
        let parts = parse_tag("<div class=\"a\"");
        assert_eq!(parts.name, "div");
        assert_eq!(values(&parts), vec![Some("a")]);
    }
}

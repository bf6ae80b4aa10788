use markup_lexer::{
    tokenize, CommentKind, DirectiveKind, GrammarProfile, LinePos, Node, NodeKind, ProfileKind,
};
use pretty_assertions::assert_eq;

fn markup(source: &str) -> Vec<Node> {
    tokenize(source, &GrammarProfile::markup())
}

fn tag(node: &Node) -> &markup_lexer::TagNode {
    node.as_tag().expect("expected a tag node")
}

#[test]
fn test_start_tag() {
    let nodes = markup("<a>");
    assert_eq!(nodes.len(), 1);
    let a = tag(&nodes[0]);
    assert_eq!(a.code, "<a>");
    assert!(!a.is_end_element);
    assert!(!a.has_self_close);
}

#[test]
fn test_end_tag() {
    let nodes = markup("</a>");
    assert_eq!(nodes.len(), 1);
    assert!(tag(&nodes[0]).is_end_element);
}

#[test]
fn test_conditional_fragments_inside_attribute_list() {
    let nodes = markup(
        r#"<td id="typeCellHeader"<c:if test='${x=="e"}'>style="display:none;"</c:if>>Type</td>"#,
    );
    assert_eq!(nodes.len(), 3);

    let td = tag(&nodes[0]);
    assert_eq!(td.name, "td");
    assert_eq!(td.attributes.len(), 4);
    let values: Vec<_> = td.attributes.iter().map(|a| a.value.as_deref()).collect();
    assert_eq!(
        values,
        vec![Some("typeCellHeader"), None, Some("display:none;"), None]
    );
    assert_eq!(td.attribute_value("style"), Some("display:none;"));

    assert_eq!(nodes[1].kind(), NodeKind::Text);
    assert_eq!(nodes[1].code(), "Type");

    let end = tag(&nodes[2]);
    assert!(end.is_end_element);
    assert!(end.is_named("td"));
}

#[test]
fn test_multiline_comment() {
    let source = "<!-- My Comment \n a -->";
    let nodes = markup(source);
    assert_eq!(nodes.len(), 1);
    let Node::Comment(comment) = &nodes[0] else {
        panic!("expected a comment, got {:?}", nodes[0]);
    };
    assert_eq!(comment.code, source);
    assert_eq!(comment.kind, CommentKind::Html);
    assert!(comment.is_markup());
    assert_eq!(nodes[0].start(), LinePos::new(1, 0));
    assert_eq!(nodes[0].end(), LinePos::new(2, 6));
}

#[test]
fn test_bom_only_input() {
    assert!(markup("\u{feff}").is_empty());
}

#[test]
fn test_bom_is_not_counted() {
    let nodes = markup("\u{feff}<a>");
    assert_eq!(nodes[0].start(), LinePos::new(1, 0));
    assert_eq!(nodes[0].end(), LinePos::new(1, 3));
    assert_eq!(nodes[0].code(), "<a>");
}

#[test]
fn test_template_delimiter_precedence() {
    let nodes = markup("<%-- c --%><%@ page x=\"1\" %><%= a %><% b(); %>");
    let summary: Vec<_> = nodes.iter().map(|n| (n.kind(), n.code())).collect();
    assert_eq!(
        summary,
        vec![
            (NodeKind::Comment, "<%-- c --%>"),
            (NodeKind::Directive, "<%@ page x=\"1\" %>"),
            (NodeKind::Expression, "<%= a %>"),
            (NodeKind::Expression, "<% b(); %>"),
        ]
    );

    let Node::Comment(comment) = &nodes[0] else {
        unreachable!()
    };
    assert_eq!(comment.kind, CommentKind::Template);
    let Node::Directive(directive) = &nodes[1] else {
        unreachable!()
    };
    assert_eq!(directive.kind, DirectiveKind::Template);
    let outputs: Vec<_> = nodes[2..]
        .iter()
        .map(|n| matches!(n, Node::Expression(e) if e.is_output()))
        .collect();
    assert_eq!(outputs, vec![true, false]);
}

#[test]
fn test_node_listing() {
    let listing: Vec<String> = markup("<!DOCTYPE html>\n<p>${user.name}</p>\n")
        .iter()
        .map(|n| format!("{:?} {}:{} {:?}", n.kind(), n.start().line, n.start().column, n.code()))
        .collect();
    insta::assert_snapshot!(listing.join("\n"), @r#"
    Directive 1:0 "<!DOCTYPE html>"
    Text 1:15 "\n"
    Tag 2:0 "<p>"
    Expression 2:3 "${user.name}"
    Tag 2:15 "</p>"
    Text 2:19 "\n"
    "#);
}

#[test]
fn test_doctype_is_a_markup_directive() {
    let nodes = markup("<!DOCTYPE html>\n<html>");
    let Node::Directive(doctype) = &nodes[0] else {
        panic!("expected a directive");
    };
    assert_eq!(doctype.kind, DirectiveKind::Markup);
    assert!(!doctype.is_template());
}

#[test]
fn test_line_endings() {
    let nodes = markup("<a>\r\n<b>\r<c>\n<d>");
    let starts: Vec<_> = nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::Tag)
        .map(|n| n.start())
        .collect();
    assert_eq!(
        starts,
        vec![
            LinePos::new(1, 0),
            LinePos::new(2, 0),
            LinePos::new(3, 0),
            LinePos::new(4, 0)
        ]
    );
}

#[test]
fn test_columns_count_characters() {
    let nodes = markup("héllo <b>");
    assert_eq!(nodes[1].start(), LinePos::new(1, 6));
}

#[test]
fn test_attribute_lines() {
    let nodes = markup("<a\n  href=\"x\"\n  id=y>");
    let lines: Vec<_> = tag(&nodes[0]).attributes.iter().map(|a| a.line).collect();
    assert_eq!(lines, vec![2, 3]);
}

#[test]
fn test_quoted_markup_stays_in_value() {
    let nodes = markup(r#"<a title="x > y <b>">t</a>"#);
    assert_eq!(nodes.len(), 3);
    assert_eq!(tag(&nodes[0]).attribute_value("title"), Some("x > y <b>"));
}

#[test]
fn test_self_closing_and_void_tags() {
    let nodes = markup("<div><br><c:out value=\"${a}\"/>x</div>");
    assert!(tag(&nodes[2]).has_self_close);
    assert_eq!(nodes[3].parent(), nodes[2].parent());
    assert_eq!(nodes[3].parent().map(|p| p.0), Some(0));
}

#[test]
fn test_component_profile() {
    let source = "<template><p :title=\"t\">{{ msg }}</p></template>\n\
                  <script>\nexport default { data() { return { a: '<p>' } } }\n</script>";
    let nodes = tokenize(source, &ProfileKind::Component.profile());
    let kinds: Vec<_> = nodes.iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Tag,
            NodeKind::Tag,
            NodeKind::Expression,
            NodeKind::Tag,
            NodeKind::Tag,
            NodeKind::Text,
            NodeKind::Tag,
            NodeKind::Text,
            NodeKind::Tag,
        ]
    );
    assert_eq!(tag(&nodes[1]).property_value("title"), Some("t"));
}

/// Small deterministic generator for malformed documents.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

const FRAGMENTS: &[&str] = &[
    "<", ">", "</", "/>", "a", "div", " ", "=", "\"", "'", "\\", "<%", "%>", "<%--", "--%>",
    "<%@", "<%=", "<!--", "-->", "<!", "<?", "?>", "<?xml", "<![CDATA[", "]]>", "${", "#{",
    "{{", "}}", "{", "}", "<script>", "</script>", "<style>", "</style>", "//", "/*", "*/",
    "\n", "\r", "\r\n", "é", "日本", "\u{feff}", "<c:if test='${x}'>", "</c:if>", "`",
];

fn generate(rng: &mut Lcg) -> String {
    let len = rng.next() % 40;
    (0..len)
        .map(|_| FRAGMENTS[(rng.next() as usize) % FRAGMENTS.len()])
        .collect()
}

/// Line/column of `offset`, counted from scratch.
fn reference_position(text: &str, offset: usize) -> LinePos {
    let prefix = &text[..offset];
    let mut pos = LinePos::START;
    let mut chars = prefix.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                pos.line += 1;
                pos.column = 0;
            }
            _ => pos.column += 1,
        }
    }
    pos
}

/// Every script start tag is closed by the first `</script>` after it, no
/// matter what quotes or comment openers the script body holds.
fn assert_script_ends_at_first_end_tag(source: &str, text: &str, nodes: &[Node]) {
    for node in nodes {
        let Some(start) = node.as_tag() else {
            continue;
        };
        if !start.is_named("script") || start.is_end_element || start.has_self_close {
            continue;
        }
        let body_start = node.span().range().end;
        let Some(idx) = text[body_start..].find("</script>") else {
            continue;
        };
        let end_offset = body_start + idx;
        let closing = nodes
            .iter()
            .find(|n| n.span().range().start == end_offset)
            .and_then(Node::as_tag);
        assert!(
            closing.is_some_and(|t| t.is_end_element && t.is_named("script")),
            "no </script> tag at {end_offset} in {source:?}: {nodes:?}"
        );
    }
}

#[test]
fn test_generated_documents() {
    let mut rng = Lcg(0x5eed);
    for profile in [GrammarProfile::markup(), GrammarProfile::component()] {
        for _ in 0..2000 {
            let source = generate(&mut rng);
            let text = source.strip_prefix('\u{feff}').unwrap_or(&source);
            let nodes = tokenize(&source, &profile);

            let joined: String = nodes.iter().map(Node::code).collect();
            assert_eq!(joined, text, "lost input for {source:?}");

            assert_script_ends_at_first_end_tag(&source, text, &nodes);

            let mut previous_end = LinePos::START;
            for node in &nodes {
                assert!(node.start() <= node.end(), "{source:?}: {node:?}");
                assert!(previous_end <= node.start(), "{source:?}: {node:?}");
                assert_eq!(
                    node.start(),
                    reference_position(text, node.span().range().start),
                    "{source:?}: {node:?}"
                );
                previous_end = node.end();
            }
        }
    }
}

#[test]
fn test_pathological_input_terminates() {
    let source = "${".repeat(5000) + &"<a ".repeat(5000) + &"{{".repeat(5000);
    let nodes = markup(&source);
    let joined: String = nodes.iter().map(Node::code).collect();
    assert_eq!(joined.len(), source.len());
}

#[test]
fn test_unmatched_end_tags_scale() {
    let n = 50_000;
    let source = "<a>".repeat(n) + &"</b>".repeat(n);
    let nodes = markup(&source);
    assert_eq!(nodes.len(), 2 * n);
    assert_eq!(nodes[n - 1].parent().map(|p| p.0), Some(n - 2));
    assert_eq!(nodes.last().and_then(Node::parent).map(|p| p.0), Some(n - 1));
}

#[test]
fn test_matched_end_tags_unwind() {
    let n = 50_000;
    let source = "<a>".repeat(n) + &"</A>".repeat(n);
    let nodes = markup(&source);
    // The k-th end tag closes start tag n-1-k and shares its parent.
    assert_eq!(nodes[n].parent().map(|p| p.0), Some(n - 2));
    assert_eq!(nodes.last().and_then(Node::parent), None);
}

fn summary(nodes: &[Node]) -> Vec<(NodeKind, &str)> {
    nodes.iter().map(|n| (n.kind(), n.code())).collect()
}

#[test]
fn test_apostrophe_in_script_template() {
    let nodes = markup("<script type=\"text/template\"><p>Don't</p></script><div>x</div>");
    assert_eq!(
        summary(&nodes),
        vec![
            (NodeKind::Tag, "<script type=\"text/template\">"),
            (NodeKind::Text, "<p>Don't</p>"),
            (NodeKind::Tag, "</script>"),
            (NodeKind::Tag, "<div>"),
            (NodeKind::Text, "x"),
            (NodeKind::Tag, "</div>"),
        ]
    );
}

#[test]
fn test_quote_in_script_regex() {
    let nodes = markup("<script>var re = /'/;</script><img src=a>");
    assert_eq!(
        summary(&nodes),
        vec![
            (NodeKind::Tag, "<script>"),
            (NodeKind::Text, "var re = /'/;"),
            (NodeKind::Tag, "</script>"),
            (NodeKind::Tag, "<img src=a>"),
        ]
    );
}

#[test]
fn test_unclosed_template_literal_in_script() {
    let nodes = markup("<script>var t = `x;</script>\n<div>\n<img src=a>\n</div>");
    assert_eq!(
        summary(&nodes),
        vec![
            (NodeKind::Tag, "<script>"),
            (NodeKind::Text, "var t = `x;"),
            (NodeKind::Tag, "</script>"),
            (NodeKind::Text, "\n"),
            (NodeKind::Tag, "<div>"),
            (NodeKind::Text, "\n"),
            (NodeKind::Tag, "<img src=a>"),
            (NodeKind::Text, "\n"),
            (NodeKind::Tag, "</div>"),
        ]
    );
    assert_eq!(nodes[4].start(), LinePos::new(2, 0));
}

#[test]
fn test_script_end_tag_inside_block_comment() {
    let nodes = markup("<script>/* </script> */<p>");
    assert_eq!(
        summary(&nodes),
        vec![
            (NodeKind::Tag, "<script>"),
            (NodeKind::Comment, "/* "),
            (NodeKind::Tag, "</script>"),
            (NodeKind::Text, " */"),
            (NodeKind::Tag, "<p>"),
        ]
    );
}

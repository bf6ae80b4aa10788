use markup_checks::{ChecksConfig, Registry};
use markup_lexer::{tokenize, tokenize_bytes, Charset, GrammarProfile, LinePos};
use markup_scanner::{metrics, scan, Metric, Phase, SourceAggregate, VisitError};
use pretty_assertions::assert_eq;
use std::io::Write;

fn check_with(config: &ChecksConfig, file: &str, source: &str) -> SourceAggregate {
    let registry = Registry::from_config(config);
    let complexity = metrics::ComplexityConfig::default();
    let nodes = tokenize(source, &GrammarProfile::markup());
    let mut aggregate = SourceAggregate::new(file);
    let report = scan(
        &nodes,
        &mut aggregate,
        &mut metrics::default_visitors(&complexity),
        &mut registry.visitors(),
    );
    assert!(report.is_clean(), "{:?}", report.failures);
    aggregate
}

fn check(source: &str) -> SourceAggregate {
    check_with(&ChecksConfig::default(), "page.jsp", source)
}

fn summary(aggregate: &SourceAggregate) -> Vec<(&str, Option<u32>)> {
    aggregate
        .sorted_issues()
        .into_iter()
        .map(|issue| (issue.rule_key(), issue.line()))
        .collect()
}

#[test]
fn test_clean_page() {
    let aggregate = check("<html><body><img src=\"a.png\" alt=\"\"><p>text</body></html>");
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());
}

#[test]
fn test_unclosed_tags() {
    let aggregate = check("<div>\n<span>\n<b>x</b>\n</div>\n<section>\n</em>");
    assert_eq!(
        summary(&aggregate),
        vec![("unclosed-tag", Some(2)), ("unclosed-tag", Some(5))]
    );
    assert_eq!(
        aggregate.sorted_issues()[0].message(),
        "The tag \"span\" has no corresponding closing tag."
    );
}

#[test]
fn test_unclosed_tag_names_ignore_case() {
    let aggregate = check("<DIV><Form></form></div>");
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());
}

#[test]
fn test_img_without_alt() {
    let aggregate = check(
        "<img src=\"a.png\">\n\
         <img [alt]=\"label\" src=\"b.png\">\n\
         <input type=\"IMAGE\" src=\"c.png\">\n\
         <input type=\"text\">\n\
         <area :alt=\"x\" href=\"#\">",
    );
    assert_eq!(
        summary(&aggregate),
        vec![("img-without-alt", Some(1)), ("img-without-alt", Some(3))]
    );
    let span = aggregate.sorted_issues()[0].span().unwrap();
    assert_eq!(span.start, LinePos::new(1, 0));
    assert_eq!(span.end, LinePos::new(1, 17));
}

#[test]
fn test_html_comments_in_server_side_templates() {
    let aggregate = check(
        "<%@ page contentType=\"text/html\" %>\n\
         <!-- visible to clients -->\n\
         <%-- hidden --%>\n\
         <!--[if IE]><p>old</p><![endif]-->",
    );
    assert_eq!(summary(&aggregate), vec![("avoid-html-comment", Some(2))]);
}

#[test]
fn test_html_comments_in_static_pages_are_fine() {
    let aggregate = check("<!-- static page --><p>${not.a.scriptlet}</p>");
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());
}

#[test]
fn test_complexity_threshold() {
    let mut config = ChecksConfig::default();
    config.complexity_threshold.max = 2;
    let aggregate = check_with(
        &config,
        "page.jsp",
        "<c:if test=\"${a}\"/><c:if test=\"${b}\"/><c:forEach items=\"${c}\"/><c:if test=\"${d}\"/>",
    );
    assert_eq!(aggregate.measure(Metric::Complexity), Some(4));
    assert_eq!(summary(&aggregate), vec![("complexity-threshold", None)]);
    assert_eq!(aggregate.issues()[0].cost(), Some(2.0));
}

#[test]
fn test_file_header() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\xef\xbb\xbf<%-- Copyright ACME --%>\r\n<p>x</p>")
        .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let mut config = ChecksConfig::default();
    config.file_header.enabled = true;
    config.file_header.header = "<%-- Copyright ACME --%>\n".to_string();
    let aggregate = check_with(&config, &path, "<%-- Copyright ACME --%>\r\n<p>x</p>");
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());

    config.file_header.header = "<%-- Copyright Initech --%>".to_string();
    let aggregate = check_with(&config, &path, "<%-- Copyright ACME --%>\r\n<p>x</p>");
    assert_eq!(summary(&aggregate), vec![("file-header", None)]);
}

fn check_header_file(header: &str, bytes: &[u8], charset: Charset) -> SourceAggregate {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();

    let mut config = ChecksConfig::default();
    config.file_header.enabled = true;
    config.file_header.header = header.to_string();
    let registry = Registry::from_config(&config);
    let nodes = tokenize_bytes(bytes, charset, &GrammarProfile::markup());
    let mut aggregate =
        SourceAggregate::new(file.path().to_str().unwrap()).with_charset(charset);
    let report = scan(&nodes, &mut aggregate, &mut [], &mut registry.visitors());
    assert!(report.is_clean(), "{:?}", report.failures);
    aggregate
}

#[test]
fn test_file_header_in_utf16() {
    let bytes: Vec<u8> = "<%-- ACME --%>\r\n<p>x</p>"
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let aggregate = check_header_file("<%-- ACME --%>\n", &bytes, Charset::Utf16Le);
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());

    let aggregate = check_header_file("<%-- Initech --%>", &bytes, Charset::Utf16Le);
    assert_eq!(summary(&aggregate), vec![("file-header", None)]);
}

#[test]
fn test_file_header_in_latin1() {
    let aggregate = check_header_file(
        "<%-- \u{a9} ACME --%>",
        b"<%-- \xa9 ACME --%>\n<p>caf\xe9</p>",
        Charset::Latin1,
    );
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());
}

#[test]
fn test_file_header_reads_only_the_start() {
    let mut bytes = b"<!-- ACME -->\n".to_vec();
    // Invalid UTF-8 far past the header.
    bytes.extend(std::iter::repeat(b'x').take(4096));
    bytes.extend([0xff, 0xfe]);
    let aggregate = check_header_file("<!-- ACME -->", &bytes, Charset::Utf8);
    assert!(aggregate.issues().is_empty(), "{:?}", aggregate.issues());
}

#[test]
fn test_file_header_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jsp");

    let mut config = ChecksConfig::default();
    config.file_header.enabled = true;
    config.file_header.header = "x".to_string();
    let registry = Registry::from_config(&config);
    let nodes = tokenize("<div>", &GrammarProfile::markup());
    let mut aggregate = SourceAggregate::new(missing.to_str().unwrap());
    let report = scan(&nodes, &mut aggregate, &mut [], &mut registry.visitors());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].phase, Phase::Checks);
    assert_eq!(report.failures[0].visitor, "file-header");
    assert!(matches!(report.failures[0].error, VisitError::Io(_)));
    // Checks registered before the failing one still reported.
    assert_eq!(summary(&aggregate), vec![("unclosed-tag", Some(1))]);
}

#[test]
fn test_apostrophe_in_script_does_not_hide_markup() {
    let aggregate = check("<script>var s = 'it's';</script>\n<img src=\"a.png\">");
    assert_eq!(summary(&aggregate), vec![("img-without-alt", Some(2))]);
}

//! Built-in metric visitors, run before any check.

use crate::aggregate::{Metric, SourceAggregate};
use crate::visitor::{VisitResult, Visitor};
use markup_lexer::{CommentNode, DirectiveNode, ExpressionNode, Node, TagNode, TextNode};
use smol_str::SmolStr;
use source_position::split_lines;
use std::collections::BTreeSet;

/// Counts lines, code lines and comment lines.
///
/// Code lines are also recorded as the aggregate's detailed lines.
#[derive(Debug, Default)]
pub struct LineMetrics {
    last_line: u32,
    code_lines: BTreeSet<u32>,
    comment_lines: BTreeSet<u32>,
}

impl LineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, first_line: u32, code: &str, is_comment: bool) {
        let lines = if is_comment {
            &mut self.comment_lines
        } else {
            &mut self.code_lines
        };
        for (line, segment) in (first_line..).zip(split_lines(code)) {
            if !segment.trim().is_empty() {
                lines.insert(line);
            }
        }
    }
}

impl Visitor for LineMetrics {
    fn name(&self) -> &str {
        "line-metrics"
    }

    fn start_document(&mut self, _aggregate: &mut SourceAggregate, nodes: &[Node]) -> VisitResult {
        self.last_line = nodes.last().map_or(0, |node| node.end().line);
        Ok(())
    }

    fn start_element(&mut self, _aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        self.record(tag.location.start.line, &tag.code, false);
        Ok(())
    }

    fn end_element(&mut self, _aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        self.record(tag.location.start.line, &tag.code, false);
        Ok(())
    }

    fn characters(&mut self, _aggregate: &mut SourceAggregate, text: &TextNode) -> VisitResult {
        self.record(text.location.start.line, &text.code, false);
        Ok(())
    }

    fn comment(&mut self, _aggregate: &mut SourceAggregate, comment: &CommentNode) -> VisitResult {
        self.record(comment.location.start.line, &comment.code, true);
        Ok(())
    }

    fn directive(
        &mut self,
        _aggregate: &mut SourceAggregate,
        directive: &DirectiveNode,
    ) -> VisitResult {
        self.record(directive.location.start.line, &directive.code, false);
        Ok(())
    }

    fn expression(
        &mut self,
        _aggregate: &mut SourceAggregate,
        expression: &ExpressionNode,
    ) -> VisitResult {
        self.record(expression.location.start.line, &expression.code, false);
        Ok(())
    }

    fn end_document(&mut self, aggregate: &mut SourceAggregate) -> VisitResult {
        aggregate.set_measure(Metric::Lines, i64::from(self.last_line));
        aggregate.set_measure(Metric::Ncloc, self.code_lines.len() as i64);
        aggregate.set_measure(Metric::CommentLines, self.comment_lines.len() as i64);
        for &line in &self.code_lines {
            aggregate.add_detailed_line(line);
        }
        Ok(())
    }
}

/// Tags and attributes counted as decision points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityConfig {
    /// Local names of control-flow tags (`c:if` counts as `if`).
    pub elements: Vec<SmolStr>,
    /// Attribute names of framework control-flow directives.
    pub attributes: Vec<SmolStr>,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            elements: ["if", "when", "forEach", "forTokens", "otherwise", "catch", "choose"]
                .into_iter()
                .map(SmolStr::new)
                .collect(),
            attributes: [
                "v-if",
                "v-else-if",
                "v-for",
                "v-show",
                "*ngIf",
                "*ngFor",
                "ng-if",
                "ng-repeat",
            ]
            .into_iter()
            .map(SmolStr::new)
            .collect(),
        }
    }
}

/// Computes [`Metric::Complexity`].
#[derive(Debug)]
pub struct ComplexityMetric<'c> {
    config: &'c ComplexityConfig,
    complexity: i64,
}

impl<'c> ComplexityMetric<'c> {
    pub fn new(config: &'c ComplexityConfig) -> Self {
        Self {
            config,
            complexity: 0,
        }
    }
}

impl Visitor for ComplexityMetric<'_> {
    fn name(&self) -> &str {
        "complexity"
    }

    fn start_element(&mut self, _aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        let local_name = tag.local_name();
        if self
            .config
            .elements
            .iter()
            .any(|name| name.eq_ignore_ascii_case(local_name))
        {
            self.complexity += 1;
        }
        let directives = tag
            .attributes
            .iter()
            .filter(|attr| !attr.synthetic)
            .filter(|attr| {
                self.config
                    .attributes
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(&attr.name))
            })
            .count();
        self.complexity += directives as i64;
        Ok(())
    }

    fn end_document(&mut self, aggregate: &mut SourceAggregate) -> VisitResult {
        aggregate.set_measure(Metric::Complexity, self.complexity);
        Ok(())
    }
}

/// Computes [`Metric::Elements`].
#[derive(Debug, Default)]
pub struct ElementMetrics {
    elements: i64,
}

impl Visitor for ElementMetrics {
    fn name(&self) -> &str {
        "elements"
    }

    fn start_element(&mut self, _aggregate: &mut SourceAggregate, _tag: &TagNode) -> VisitResult {
        self.elements += 1;
        Ok(())
    }

    fn end_document(&mut self, aggregate: &mut SourceAggregate) -> VisitResult {
        aggregate.set_measure(Metric::Elements, self.elements);
        Ok(())
    }
}

/// The metric visitors run on every file, freshly created for one scan.
pub fn default_visitors(complexity: &ComplexityConfig) -> Vec<Box<dyn Visitor + '_>> {
    vec![
        Box::new(LineMetrics::new()),
        Box::new(ComplexityMetric::new(complexity)),
        Box::new(ElementMetrics::default()),
    ]
}

//! Two-phase dispatch of a node sequence to visitors.

use crate::aggregate::SourceAggregate;
use crate::visitor::{VisitError, VisitResult, Visitor};
use markup_lexer::Node;
use std::fmt;

/// The phase a visitor runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Metrics,
    Checks,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Metrics => "metrics",
            Phase::Checks => "checks",
        })
    }
}

/// A visitor callback that returned an error.
#[derive(Debug)]
pub struct VisitorFailure {
    pub phase: Phase,
    pub visitor: String,
    pub error: VisitError,
}

/// Outcome of a [`scan`].
#[derive(Debug, Default)]
pub struct ScanReport {
    pub failures: Vec<VisitorFailure>,
}

impl ScanReport {
    /// Returns true if every visitor completed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the metric visitors, then the check visitors, over `nodes`.
///
/// Within a phase every visitor sees `start_document`, then each node in
/// source order, then `end_document`. Tags dispatch to `start_element`
/// unless they are end tags, and to `end_element` when they are end tags or
/// self-closing.
///
/// A visitor whose callback fails receives no further callbacks in that
/// phase. The failure is recorded in the report and the remaining visitors
/// carry on; anything already written to the aggregate is kept.
pub fn scan(
    nodes: &[Node],
    aggregate: &mut SourceAggregate,
    metric_visitors: &mut [Box<dyn Visitor + '_>],
    check_visitors: &mut [Box<dyn Visitor + '_>],
) -> ScanReport {
    let mut report = ScanReport::default();
    PhaseRun::new(Phase::Metrics, aggregate, metric_visitors, &mut report).run(nodes);
    PhaseRun::new(Phase::Checks, aggregate, check_visitors, &mut report).run(nodes);
    report
}

struct PhaseRun<'a, 'v> {
    phase: Phase,
    aggregate: &'a mut SourceAggregate,
    visitors: &'a mut [Box<dyn Visitor + 'v>],
    active: Vec<bool>,
    report: &'a mut ScanReport,
}

impl<'a, 'v> PhaseRun<'a, 'v> {
    fn new(
        phase: Phase,
        aggregate: &'a mut SourceAggregate,
        visitors: &'a mut [Box<dyn Visitor + 'v>],
        report: &'a mut ScanReport,
    ) -> Self {
        let active = vec![true; visitors.len()];
        Self {
            phase,
            aggregate,
            visitors,
            active,
            report,
        }
    }

    fn run(mut self, nodes: &[Node]) {
        self.each(|visitor, aggregate| visitor.start_document(aggregate, nodes));
        for node in nodes {
            self.each(|visitor, aggregate| dispatch(visitor, aggregate, node));
        }
        self.each(|visitor, aggregate| visitor.end_document(aggregate));
    }

    /// Applies `step` to every visitor that has not failed yet.
    fn each(&mut self, mut step: impl FnMut(&mut dyn Visitor, &mut SourceAggregate) -> VisitResult) {
        for (idx, visitor) in self.visitors.iter_mut().enumerate() {
            if !self.active[idx] {
                continue;
            }
            if let Err(error) = step(visitor.as_mut(), &mut *self.aggregate) {
                tracing::warn!(
                    phase = %self.phase,
                    visitor = visitor.name(),
                    file = %self.aggregate.file(),
                    %error,
                    "visitor failed"
                );
                self.active[idx] = false;
                self.report.failures.push(VisitorFailure {
                    phase: self.phase,
                    visitor: visitor.name().to_string(),
                    error,
                });
            }
        }
    }
}

fn dispatch(visitor: &mut dyn Visitor, aggregate: &mut SourceAggregate, node: &Node) -> VisitResult {
    match node {
        Node::Tag(tag) => {
            if !tag.is_end_element {
                visitor.start_element(aggregate, tag)?;
            }
            if tag.is_end_element || tag.has_self_close {
                visitor.end_element(aggregate, tag)?;
            }
            Ok(())
        }
        Node::Text(text) => visitor.characters(aggregate, text),
        Node::Comment(comment) => visitor.comment(aggregate, comment),
        Node::Directive(directive) => visitor.directive(aggregate, directive),
        Node::Expression(expression) => visitor.expression(aggregate, expression),
    }
}

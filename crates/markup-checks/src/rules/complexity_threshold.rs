//! `complexity-threshold`: files whose complexity measure is too high.

use crate::config::ComplexityThresholdConfig;
use markup_lexer::Node;
use markup_scanner::{Check, Issue, Metric, SourceAggregate, VisitError, VisitResult, Visitor};

pub const KEY: &str = "complexity-threshold";

pub struct ComplexityThreshold {
    max: i64,
}

impl ComplexityThreshold {
    pub fn new(config: &ComplexityThresholdConfig) -> Self {
        Self { max: config.max }
    }
}

impl Check for ComplexityThreshold {
    fn key(&self) -> &'static str {
        KEY
    }

    fn visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(ComplexityThresholdVisitor { max: self.max })
    }
}

struct ComplexityThresholdVisitor {
    max: i64,
}

impl Visitor for ComplexityThresholdVisitor {
    fn name(&self) -> &str {
        KEY
    }

    fn start_document(&mut self, aggregate: &mut SourceAggregate, _nodes: &[Node]) -> VisitResult {
        let Some(complexity) = aggregate.measure(Metric::Complexity) else {
            return Ok(());
        };
        if complexity <= self.max {
            return Ok(());
        }
        let issue = Issue::file_level(
            KEY,
            format!(
                "The complexity of this file is {complexity}, above the maximum of {}.",
                self.max
            ),
        )
        .with_cost((complexity - self.max) as f64)
        .map_err(|error| VisitError::failed(error.to_string()))?;
        aggregate.add_issue(issue);
        Ok(())
    }
}

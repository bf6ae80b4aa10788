//! Issue types.

use smol_str::SmolStr;
use source_position::LinePos;
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised when building an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IssueError {
    /// The remediation cost must be a finite, strictly positive number.
    #[error("issue cost must be strictly positive, got {0}")]
    InvalidCost(f64),
}

/// A precise start/end location of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueSpan {
    pub start: LinePos,
    pub end: LinePos,
}

/// One finding reported by a check.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    rule_key: SmolStr,
    line: Option<u32>,
    message: String,
    cost: Option<f64>,
    span: Option<IssueSpan>,
}

impl Issue {
    /// Creates an issue on `line`, or a file-level issue when `line` is
    /// `None`.
    pub fn new(rule_key: impl Into<SmolStr>, line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.into(),
            line,
            message: message.into(),
            cost: None,
            span: None,
        }
    }

    /// Creates an issue on a line.
    pub fn at_line(rule_key: impl Into<SmolStr>, line: u32, message: impl Into<String>) -> Self {
        Self::new(rule_key, Some(line), message)
    }

    /// Creates an issue about the file as a whole.
    pub fn file_level(rule_key: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        Self::new(rule_key, None, message)
    }

    /// Sets the remediation cost.
    ///
    /// Returns [`IssueError::InvalidCost`] for zero, negative, NaN and
    /// infinite values.
    pub fn with_cost(mut self, cost: f64) -> Result<Self, IssueError> {
        if !(cost > 0.0 && cost.is_finite()) {
            return Err(IssueError::InvalidCost(cost));
        }
        self.cost = Some(cost);
        Ok(self)
    }

    /// Sets the precise span. The issue line becomes the span's start line.
    pub fn with_span(mut self, start: LinePos, end: LinePos) -> Self {
        self.line = Some(start.line);
        self.span = Some(IssueSpan { start, end });
        self
    }

    pub fn rule_key(&self) -> &str {
        &self.rule_key
    }

    /// The line of the issue; `None` for file-level issues.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn span(&self) -> Option<IssueSpan> {
        self.span
    }

    /// The canonical report order: by line, file-level issues first, then
    /// by message.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.message.cmp(&other.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cost_must_be_positive() {
        assert_eq!(
            Issue::file_level("rule", "m").with_cost(0.0),
            Err(IssueError::InvalidCost(0.0))
        );
        assert_eq!(
            Issue::file_level("rule", "m").with_cost(-1.0),
            Err(IssueError::InvalidCost(-1.0))
        );
        let issue = Issue::file_level("rule", "m").with_cost(0.5).unwrap();
        assert_eq!(issue.cost(), Some(0.5));
    }

    #[test]
    fn test_cost_must_be_finite() {
        assert!(Issue::file_level("rule", "m").with_cost(f64::NAN).is_err());
        assert!(Issue::file_level("rule", "m")
            .with_cost(f64::INFINITY)
            .is_err());
    }

    #[test]
    fn test_canonical_order() {
        let mut issues = vec![
            Issue::new("r", None, "b"),
            Issue::at_line("r", 3, "a"),
            Issue::at_line("r", 1, "c"),
            Issue::at_line("r", 3, "c"),
        ];
        // The report order does not depend on insertion order.
        issues.swap(1, 3);
        issues.sort_by(Issue::canonical_cmp);
        let order: Vec<_> = issues.iter().map(|i| (i.line(), i.message())).collect();
        assert_eq!(
            order,
            vec![(None, "b"), (Some(1), "c"), (Some(3), "a"), (Some(3), "c")]
        );
    }

    #[test]
    fn test_span_sets_line() {
        let issue = Issue::file_level("r", "m").with_span(LinePos::new(4, 2), LinePos::new(4, 9));
        assert_eq!(issue.line(), Some(4));
        assert_eq!(issue.span().map(|s| s.end), Some(LinePos::new(4, 9)));
    }
}

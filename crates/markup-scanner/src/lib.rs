//! Visitor dispatch over tokenized markup templates.
//!
//! This crate drives analysis visitors over the node sequence produced by
//! `markup-lexer`:
//! - [`Visitor`]: the callback set, with no-op defaults
//! - [`scan`]: metric visitors first, then check visitors, in source order
//! - [`SourceAggregate`]: the per-file sink of [`Issue`]s and measures
//! - [`metrics`]: line, complexity and element counts
//!
//! # Example
//!
//! ```
//! use markup_lexer::{tokenize, GrammarProfile};
//! use markup_scanner::{metrics, scan, Metric, SourceAggregate};
//!
//! let nodes = tokenize("<p>\n  Hello\n</p>", &GrammarProfile::markup());
//! let config = metrics::ComplexityConfig::default();
//! let mut aggregate = SourceAggregate::new("index.html");
//! scan(&nodes, &mut aggregate, &mut metrics::default_visitors(&config), &mut []);
//!
//! assert_eq!(aggregate.measure(Metric::Lines), Some(3));
//! ```

mod aggregate;
mod issue;
pub mod metrics;
mod scanner;
mod visitor;

pub use aggregate::{Metric, SourceAggregate};
pub use issue::{Issue, IssueError, IssueSpan};
pub use scanner::{scan, Phase, ScanReport, VisitorFailure};
pub use visitor::{Check, VisitError, VisitResult, Visitor};

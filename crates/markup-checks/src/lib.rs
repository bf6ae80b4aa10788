//! Analysis rules for markup templates.
//!
//! Each rule is a [`Check`](markup_scanner::Check): immutable parameters
//! plus a factory for per-scan visitors. A [`Registry`] built from
//! [`ChecksConfig`] holds the enabled rules:
//! - `unclosed-tag`: start tags never closed
//! - `img-without-alt`: images without an `alt` text
//! - `avoid-html-comment`: HTML comments in server-side templates
//! - `complexity-threshold`: files above a complexity limit
//! - `file-header`: files missing a required header
//!
//! # Example
//!
//! ```
//! use markup_checks::{ChecksConfig, Registry};
//! use markup_lexer::{tokenize, GrammarProfile};
//! use markup_scanner::{scan, SourceAggregate};
//!
//! let registry = Registry::from_config(&ChecksConfig::default());
//! let nodes = tokenize(r#"<img src="logo.png">"#, &GrammarProfile::markup());
//! let mut aggregate = SourceAggregate::new("index.html");
//! scan(&nodes, &mut aggregate, &mut [], &mut registry.visitors());
//!
//! assert_eq!(aggregate.issues()[0].rule_key(), "img-without-alt");
//! ```

mod config;
mod registry;
pub mod rules;

pub use config::{
    ChecksConfig, ComplexityThresholdConfig, FileHeaderConfig, Toggle, UnclosedTagConfig,
};
pub use registry::Registry;

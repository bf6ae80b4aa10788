//! Source position tracking for markscan.
//!
//! Template files are tokenized front to back, so positions are produced by
//! a forward-only [`PositionTracker`] instead of a random-access index. Byte
//! [`Span`]s address the tokenized text; [`LinePos`] values are what issues
//! and reports show to users.

mod lines;
mod span;
mod tracker;

pub use lines::{split_lines, SplitLines};
pub use span::Span;
pub use tracker::{strip_bom, LinePos, PositionTracker, BOM};

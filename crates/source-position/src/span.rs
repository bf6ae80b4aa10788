//! Byte spans into the tokenized text.

use std::ops::Range;
use text_size::TextSize;

/// A half-open byte range `[start, end)` of the tokenized text, counted
/// after BOM removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: TextSize,
    pub end: TextSize,
}

impl Span {
    /// Creates a span from `usize` offsets as produced by string slicing.
    #[inline]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self {
            start: TextSize::from(start as u32),
            end: TextSize::from(end as u32),
        }
    }

    /// The span as a range usable for slicing.
    #[inline]
    pub fn range(self) -> Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }
}

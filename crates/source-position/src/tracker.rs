//! Streaming line/column tracking.

use std::fmt;

/// The byte order mark, as decoded into a `char`.
pub const BOM: char = '\u{feff}';

/// Removes a leading byte order mark, if any.
///
/// Positions are always computed on the returned text, so the BOM never
/// shifts a column.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// A line and column position.
///
/// Lines are 1-based, columns are 0-based and counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinePos {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
}

impl LinePos {
    /// The position of the first character of a document.
    pub const START: LinePos = LinePos { line: 1, column: 0 };

    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for LinePos {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for LinePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Converts a forward-moving byte cursor into line/column positions.
///
/// The tracker only moves forward, so converting every node boundary of a
/// document costs one pass over the text. `\n`, `\r` and `\r\n` each end a
/// line; a `\r\n` pair is counted once even when a node boundary falls
/// between the two characters.
#[derive(Debug, Clone)]
pub struct PositionTracker<'a> {
    text: &'a str,
    offset: usize,
    pos: LinePos,
    after_cr: bool,
}

impl<'a> PositionTracker<'a> {
    /// Creates a tracker positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            pos: LinePos::START,
            after_cr: false,
        }
    }

    /// Returns the current byte offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the current line/column position.
    #[inline]
    pub fn position(&self) -> LinePos {
        self.pos
    }

    /// Moves the cursor forward to `target` and returns the position there.
    ///
    /// Targets behind the cursor leave it unchanged; targets past the end
    /// stop at the end of the text.
    pub fn advance_to(&mut self, target: usize) -> LinePos {
        let target = target.min(self.text.len());
        if target <= self.offset {
            return self.pos;
        }

        let text = self.text;
        for c in text[self.offset..].chars() {
            if self.offset >= target {
                break;
            }
            self.offset += c.len_utf8();
            match c {
                '\n' if self.after_cr => {
                    self.after_cr = false;
                }
                '\n' => {
                    self.pos.line += 1;
                    self.pos.column = 0;
                }
                '\r' => {
                    self.pos.line += 1;
                    self.pos.column = 0;
                    self.after_cr = true;
                }
                _ => {
                    self.pos.column += 1;
                    self.after_cr = false;
                }
            }
        }

        self.pos
    }
}

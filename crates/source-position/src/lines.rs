//! Line splitting that agrees with [`PositionTracker`](crate::PositionTracker).

/// Splits text into lines at `\n`, `\r` and `\r\n`.
///
/// Unlike [`str::lines`], a lone `\r` also ends a line, and a trailing line
/// terminator yields a final empty line, so the number of items equals the
/// number of lines the tracker walks through.
pub fn split_lines(text: &str) -> SplitLines<'_> {
    SplitLines {
        rest: Some(text),
    }
}

/// Iterator returned by [`split_lines`].
#[derive(Debug, Clone)]
pub struct SplitLines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest?;
        match rest.find(['\r', '\n']) {
            Some(idx) => {
                let line = &rest[..idx];
                let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = Some(&rest[idx + skip..]);
                Some(line)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mixed_terminators() {
        let lines: Vec<_> = split_lines("a\nb\r\nc\rd").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_trailing_terminator_yields_empty_line() {
        let lines: Vec<_> = split_lines("a\n").collect();
        assert_eq!(lines, vec!["a", ""]);
    }

    #[test]
    fn test_empty_text() {
        let lines: Vec<_> = split_lines("").collect();
        assert_eq!(lines, vec![""]);
    }
}

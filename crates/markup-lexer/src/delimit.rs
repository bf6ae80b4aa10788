//! Closing-delimiter searches shared by the channels and the tag lexer.
//!
//! Every search moves strictly forward over the bytes it is given and
//! reports where the construct ends, so the tokenizer stays linear.

/// Finds the end of a quoted run.
///
/// `bytes` starts right after the opening quote. Returns the length up to
/// and including the closing quote, skipping backslash escapes, or `None`
/// when the quote is never closed.
pub(crate) fn quoted_len(bytes: &[u8], quote: u8) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Finds the end of a tag whose `<` has already been consumed.
///
/// `bytes` starts right after the `<`. Quotes open a value only after `=`,
/// and `<`/`>` pairs nest so that fragments like `<c:if test="x">` embedded
/// in an attribute list stay inside the tag. Returns the offset just past
/// the closing `>`, or `bytes.len()` when the tag is never closed.
pub(crate) fn tag_end(bytes: &[u8]) -> usize {
    let mut depth = 1usize;
    let mut after_eq = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' if after_eq => match quoted_len(&bytes[i + 1..], b) {
                Some(len) => {
                    i += 1 + len;
                    after_eq = false;
                    continue;
                }
                None => return bytes.len(),
            },
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            after_eq = b == b'=';
        }
        i += 1;
    }
    bytes.len()
}

/// Finds the end of a brace-delimited expression.
///
/// `bytes` starts right after the opener, which left `depth` braces open.
/// Quoted strings are skipped; a string ends at its quote or at the end of
/// its line. Returns the offset just past the brace that closes the last
/// level, or `None` when input ends first.
pub(crate) fn braced_end(bytes: &[u8], mut depth: usize) -> Option<usize> {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            quote @ (b'"' | b'\'') => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != quote && bytes[j] != b'\n' {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                i = j;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Finds the end of a line comment: the first line terminator, exclusive.
pub(crate) fn line_end(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .unwrap_or(bytes.len())
}

/// Returns true for characters that may continue a tag name.
pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

//! Decoding of raw file bytes before tokenization.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Character encoding of a template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    /// UTF-8; malformed sequences decode to U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1, one byte per character.
    Latin1,
    Utf16Le,
    Utf16Be,
}

/// Error for an unrecognized charset label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported charset: {0}")]
pub struct UnknownCharset(pub String);

impl Charset {
    /// Parses an encoding label such as `utf-8`, `ISO-8859-1` or `UTF-16LE`.
    pub fn from_label(label: &str) -> Result<Self, UnknownCharset> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Ok(Charset::Utf8),
            "latin1" | "iso88591" | "l1" => Ok(Charset::Latin1),
            "utf16le" => Ok(Charset::Utf16Le),
            "utf16be" | "utf16" => Ok(Charset::Utf16Be),
            _ => Err(UnknownCharset(label.to_string())),
        }
    }

    /// Canonical label of the charset.
    pub fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf16Be => "UTF-16BE",
        }
    }

    /// Decodes `bytes`. Decoding never fails: invalid input becomes U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes),
            Charset::Latin1 => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::Utf16Le => Cow::Owned(decode_utf16(bytes, u16::from_le_bytes)),
            Charset::Utf16Be => Cow::Owned(decode_utf16(bytes, u16::from_be_bytes)),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let odd = !chunks.remainder().is_empty();
    let mut decoded: String = char::decode_utf16(chunks.map(|pair| unit([pair[0], pair[1]])))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if odd {
        decoded.push(char::REPLACEMENT_CHARACTER);
    }
    decoded
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Charset {
    type Err = UnknownCharset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::from_label(s)
    }
}

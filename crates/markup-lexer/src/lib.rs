//! Error-tolerant tokenizer for markup templates.
//!
//! This crate turns HTML documents with embedded server-side or framework
//! syntax (JSP, PHP, ERB, EL, Angular, Vue) into a flat sequence of
//! positioned [`Node`]s:
//! - Tags with their attributes, including tag fragments embedded in an
//!   attribute list
//! - Text, comments, directives and expressions
//! - Raw `script`/`style` content with code comments split out
//!
//! Tokenization never fails. Malformed input still produces nodes whose
//! code, concatenated in order, reproduces the (BOM-stripped) input.
//!
//! # Example
//!
//! ```
//! use markup_lexer::{tokenize, GrammarProfile, NodeKind};
//!
//! let nodes = tokenize("<p>Hello ${user}</p>", &GrammarProfile::markup());
//! let kinds: Vec<_> = nodes.iter().map(|n| n.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [NodeKind::Tag, NodeKind::Text, NodeKind::Expression, NodeKind::Tag]
//! );
//! ```

mod charset;
mod delimit;
mod lexer;
mod node;
mod profile;
mod tag;

pub use charset::{Charset, UnknownCharset};
pub use lexer::Tokenizer;
pub use node::*;
pub use profile::{
    Channel, ChannelKind, GrammarProfile, ProfileError, ProfileKind, UnknownProfile,
};
pub use source_position::{LinePos, Span};

use std::io::{self, Read};

/// Tokenizes a document with the given grammar profile.
pub fn tokenize(source: &str, profile: &GrammarProfile) -> Vec<Node> {
    Tokenizer::new(source, profile).tokenize()
}

/// Decodes `bytes` with `charset` and tokenizes the result.
pub fn tokenize_bytes(bytes: &[u8], charset: Charset, profile: &GrammarProfile) -> Vec<Node> {
    tokenize(&charset.decode(bytes), profile)
}

/// Reads a whole document from `reader` and tokenizes it.
///
/// Only read errors are reported; decoding is lossy.
pub fn tokenize_reader<R: Read>(
    mut reader: R,
    charset: Charset,
    profile: &GrammarProfile,
) -> io::Result<Vec<Node>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    tracing::trace!(bytes = bytes.len(), %charset, "read document");
    Ok(tokenize_bytes(&bytes, charset, profile))
}

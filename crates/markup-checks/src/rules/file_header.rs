//! `file-header`: files must start with a given header.

use crate::config::FileHeaderConfig;
use markup_lexer::Node;
use markup_scanner::{Check, Issue, SourceAggregate, VisitResult, Visitor};
use std::fs::File;
use std::io::Read;

pub const KEY: &str = "file-header";

pub struct FileHeader {
    header: String,
    /// Bytes read from the file: enough for the header in any supported
    /// charset, with CRLF line breaks and a byte order mark.
    read_limit: u64,
}

impl FileHeader {
    pub fn new(config: &FileHeaderConfig) -> Self {
        let header = normalize(&config.header);
        let read_limit = header.chars().count() as u64 * 8 + 4;
        Self { header, read_limit }
    }
}

impl Check for FileHeader {
    fn key(&self) -> &'static str {
        KEY
    }

    fn visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(FileHeaderVisitor { check: self })
    }
}

struct FileHeaderVisitor<'c> {
    check: &'c FileHeader,
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

impl Visitor for FileHeaderVisitor<'_> {
    fn name(&self) -> &str {
        KEY
    }

    /// Compares against the file on disk, not the decoded nodes.
    fn start_document(&mut self, aggregate: &mut SourceAggregate, _nodes: &[Node]) -> VisitResult {
        let mut bytes = Vec::new();
        File::open(aggregate.file())?
            .take(self.check.read_limit)
            .read_to_end(&mut bytes)?;
        let content = aggregate.charset().decode(&bytes);
        let content = normalize(content.strip_prefix('\u{feff}').unwrap_or(&*content));
        if !content.starts_with(&self.check.header) {
            tracing::debug!(file = %aggregate.file(), "file header mismatch");
            aggregate.add_issue(Issue::file_level(
                KEY,
                "Add or update the header of this file.",
            ));
        }
        Ok(())
    }
}

//! `unclosed-tag`: start tags that are never closed.

use crate::config::UnclosedTagConfig;
use markup_lexer::TagNode;
use markup_scanner::{Check, Issue, SourceAggregate, VisitResult, Visitor};
use rustc_hash::FxHashSet;

pub const KEY: &str = "unclosed-tag";

pub struct UnclosedTag {
    ignored: FxHashSet<String>,
}

impl UnclosedTag {
    pub fn new(config: &UnclosedTagConfig) -> Self {
        Self {
            ignored: config
                .ignore_tags
                .iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
        }
    }

    fn is_ignored(&self, tag: &TagNode) -> bool {
        tag.is_void() || self.ignored.contains(&tag.name.to_ascii_lowercase())
    }
}

impl Check for UnclosedTag {
    fn key(&self) -> &'static str {
        KEY
    }

    fn visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(UnclosedTagVisitor {
            check: self,
            open: Vec::new(),
        })
    }
}

struct OpenTag {
    name: String,
    line: u32,
}

struct UnclosedTagVisitor<'c> {
    check: &'c UnclosedTag,
    open: Vec<OpenTag>,
}

fn report(aggregate: &mut SourceAggregate, tag: &OpenTag) {
    aggregate.add_issue(Issue::at_line(
        KEY,
        tag.line,
        format!("The tag \"{}\" has no corresponding closing tag.", tag.name),
    ));
}

impl Visitor for UnclosedTagVisitor<'_> {
    fn name(&self) -> &str {
        KEY
    }

    fn start_element(&mut self, _aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        if !tag.has_self_close && !self.check.is_ignored(tag) {
            self.open.push(OpenTag {
                name: tag.name.to_string(),
                line: tag.location.start.line,
            });
        }
        Ok(())
    }

    fn end_element(&mut self, aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        if !tag.is_end_element {
            return Ok(());
        }
        // Dangling end tags are left alone.
        let Some(idx) = self.open.iter().rposition(|open| tag.is_named(&open.name)) else {
            return Ok(());
        };
        for unclosed in self.open.drain(idx + 1..) {
            report(aggregate, &unclosed);
        }
        self.open.truncate(idx);
        Ok(())
    }

    fn end_document(&mut self, aggregate: &mut SourceAggregate) -> VisitResult {
        for unclosed in self.open.drain(..) {
            report(aggregate, &unclosed);
        }
        Ok(())
    }
}

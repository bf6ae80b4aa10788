//! `img-without-alt`: images without a text alternative.

use markup_lexer::TagNode;
use markup_scanner::{Check, Issue, SourceAggregate, VisitResult, Visitor};

pub const KEY: &str = "img-without-alt";

pub struct ImgWithoutAlt;

impl Check for ImgWithoutAlt {
    fn key(&self) -> &'static str {
        KEY
    }

    fn visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(ImgWithoutAltVisitor)
    }
}

struct ImgWithoutAltVisitor;

/// Returns true for elements that render as an image.
fn is_image(tag: &TagNode) -> bool {
    tag.is_named("img")
        || tag.is_named("area")
        || (tag.is_named("input")
            && tag
                .attribute_value("type")
                .is_some_and(|kind| kind.eq_ignore_ascii_case("image")))
}

impl Visitor for ImgWithoutAltVisitor {
    fn name(&self) -> &str {
        KEY
    }

    fn start_element(&mut self, aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        // Bound forms such as `[alt]` or `:alt` count as an alt attribute.
        if is_image(tag) && tag.property("alt").is_none() {
            aggregate.add_issue(
                Issue::file_level(
                    KEY,
                    format!("Add an \"alt\" attribute to this <{}> element.", tag.name),
                )
                .with_span(tag.location.start, tag.location.end),
            );
        }
        Ok(())
    }
}

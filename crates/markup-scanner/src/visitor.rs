//! The visitor capability set and the check factory trait.

use crate::aggregate::SourceAggregate;
use markup_lexer::{CommentNode, DirectiveNode, ExpressionNode, Node, TagNode, TextNode};
use thiserror::Error;

/// Errors a visitor may return from a callback.
#[derive(Debug, Error)]
pub enum VisitError {
    /// An external resource, such as the file itself, could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

impl VisitError {
    pub fn failed(message: impl Into<String>) -> Self {
        VisitError::Failed(message.into())
    }
}

pub type VisitResult = Result<(), VisitError>;

/// Callbacks driven by [`scan`](crate::scan).
///
/// Every callback defaults to doing nothing, so a visitor only implements
/// the ones it needs. The aggregate of the file being scanned is passed to
/// each call.
#[allow(unused_variables)]
pub trait Visitor {
    /// A short name used when reporting failures.
    fn name(&self) -> &str;

    /// Called once before any node, with the whole sequence.
    fn start_document(&mut self, aggregate: &mut SourceAggregate, nodes: &[Node]) -> VisitResult {
        Ok(())
    }

    /// Called for start tags, including self-closing ones.
    fn start_element(&mut self, aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        Ok(())
    }

    /// Called for end tags and, after `start_element`, for self-closing
    /// tags.
    fn end_element(&mut self, aggregate: &mut SourceAggregate, tag: &TagNode) -> VisitResult {
        Ok(())
    }

    fn characters(&mut self, aggregate: &mut SourceAggregate, text: &TextNode) -> VisitResult {
        Ok(())
    }

    fn comment(&mut self, aggregate: &mut SourceAggregate, comment: &CommentNode) -> VisitResult {
        Ok(())
    }

    fn directive(
        &mut self,
        aggregate: &mut SourceAggregate,
        directive: &DirectiveNode,
    ) -> VisitResult {
        Ok(())
    }

    fn expression(
        &mut self,
        aggregate: &mut SourceAggregate,
        expression: &ExpressionNode,
    ) -> VisitResult {
        Ok(())
    }

    /// Called once after the last node.
    fn end_document(&mut self, aggregate: &mut SourceAggregate) -> VisitResult {
        Ok(())
    }
}

/// An analysis rule.
///
/// A check holds only immutable configuration and can be shared between
/// threads; all per-file state lives in the visitor it creates for each
/// scan.
pub trait Check: Send + Sync {
    /// The rule key reported on issues.
    fn key(&self) -> &'static str;

    /// Creates a fresh visitor for one scan.
    fn visitor(&self) -> Box<dyn Visitor + '_>;
}

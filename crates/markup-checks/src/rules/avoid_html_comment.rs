//! `avoid-html-comment`: HTML comments in server-side templates are sent
//! to the client; template comments are not.

use markup_lexer::{CommentKind, CommentNode, ExpressionKind, Node};
use markup_scanner::{Check, Issue, SourceAggregate, VisitResult, Visitor};

pub const KEY: &str = "avoid-html-comment";

pub struct AvoidHtmlComment;

impl Check for AvoidHtmlComment {
    fn key(&self) -> &'static str {
        KEY
    }

    fn visitor(&self) -> Box<dyn Visitor + '_> {
        Box::new(AvoidHtmlCommentVisitor {
            server_side: false,
        })
    }
}

struct AvoidHtmlCommentVisitor {
    server_side: bool,
}

fn is_server_side(node: &Node) -> bool {
    match node {
        Node::Directive(directive) => directive.is_template(),
        Node::Expression(expression) => {
            matches!(expression.kind, ExpressionKind::Scriptlet | ExpressionKind::Php)
        }
        _ => false,
    }
}

impl Visitor for AvoidHtmlCommentVisitor {
    fn name(&self) -> &str {
        KEY
    }

    fn start_document(&mut self, _aggregate: &mut SourceAggregate, nodes: &[Node]) -> VisitResult {
        self.server_side = nodes.iter().any(is_server_side);
        Ok(())
    }

    fn comment(&mut self, aggregate: &mut SourceAggregate, comment: &CommentNode) -> VisitResult {
        if self.server_side
            && comment.kind == CommentKind::Html
            && !comment.code.starts_with("<!--[if")
        {
            aggregate.add_issue(Issue::at_line(
                KEY,
                comment.location.start.line,
                "Remove this comment or turn it into a template comment.",
            ));
        }
        Ok(())
    }
}

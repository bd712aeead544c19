//! Re-indenting spliced fragments
//!
//! A fragment spliced after an indented line should keep its own internal
//! layout relative to that indentation, so every line break inside it gets the
//! indentation unit appended. Only `Newline` trivia qualifies; line breaks
//! inside string literals belong to the literal and are left alone.

use crate::interpolation::Indentation;
use rowan::GreenNode;
use weft_syntax::SyntaxKind;
use weft_syntax::trivia::{TriviaEdit, green_token, map_trivia};

/// Applies an indentation unit after every line break of a tree
#[derive(Debug, Clone)]
pub struct Indenter {
    indentation: Indentation,
}

impl Indenter {
    pub fn new(indentation: Indentation) -> Self {
        Self { indentation }
    }

    /// Indented copy of `node`
    ///
    /// Sub-trees without line breaks are shared with `node`; a tree without any
    /// line break comes back as `node` itself.
    pub fn indent(&self, node: &GreenNode) -> GreenNode {
        let unit = self.indentation.to_text();
        if unit.is_empty() {
            return node.clone();
        }

        let whitespace = green_token(SyntaxKind::Whitespace, &unit);
        let mut inserted = 0usize;
        let indented = map_trivia(node, &mut |kind, _| {
            if kind == SyntaxKind::Newline {
                inserted += 1;
                TriviaEdit::InsertAfter(vec![whitespace.clone()])
            } else {
                TriviaEdit::Keep
            }
        });

        match indented {
            Some(indented) => {
                tracing::trace!(lines = inserted, indentation = ?self.indentation, "re-indented fragment");
                indented
            }
            None => node.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::{EntryPoint, SyntaxNode, parse};

    fn text(green: &GreenNode) -> String {
        SyntaxNode::new_root(green.clone()).to_string()
    }

    #[test]
    fn test_indents_every_line_break() {
        let stmt = parse("if a {\n  b()\n}", EntryPoint::Stmt).green;
        let indented = Indenter::new(Indentation::Spaces(4)).indent(&stmt);
        assert_eq!(text(&indented), "if a {\n      b()\n    }");
    }

    #[test]
    fn test_tabs() {
        let stmt = parse("while x {\ny()\n}", EntryPoint::Stmt).green;
        let indented = Indenter::new(Indentation::Tabs(2)).indent(&stmt);
        assert_eq!(text(&indented), "while x {\n\t\ty()\n\t\t}");
    }

    #[test]
    fn test_single_line_fragment_is_returned_as_is() {
        let expr = parse("a + b", EntryPoint::Expr).green;
        let indented = Indenter::new(Indentation::Spaces(2)).indent(&expr);
        assert!(std::ptr::eq(&*expr, &*indented));
    }

    #[test]
    fn test_multiline_string_untouched() {
        let decl = parse("let s = \"\"\"\n  body\n  \"\"\"", EntryPoint::Decl).green;
        let indented = Indenter::new(Indentation::Spaces(8)).indent(&decl);
        assert!(std::ptr::eq(&*decl, &*indented));
    }

    #[test]
    fn test_comment_line_breaks_indented() {
        let block = parse("{\n// note\nx\n}", EntryPoint::CodeBlock).green;
        let indented = Indenter::new(Indentation::Spaces(2)).indent(&block);
        assert_eq!(text(&indented), "{\n  // note\n  x\n  }");
    }
}

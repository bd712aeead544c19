//! Copy-on-write trivia rewriting
//!
//! Green trees are immutable and shared, so rewriting trivia means rebuilding
//! the path from every changed token up to the root. Sub-trees that contain no
//! changed trivia are reused as they are: the result shares them with the
//! input by reference count.

use crate::SyntaxKind;
use crate::language::raw_kind;
use rowan::{GreenNode, GreenNodeData, GreenToken, NodeOrToken, TextSize};

type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// What to do with one trivia token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaEdit {
    Keep,
    /// Keep the token and put these tokens right after it
    InsertAfter(Vec<GreenToken>),
    /// Swap the token for these tokens (possibly none)
    Replace(Vec<GreenToken>),
}

/// Build a standalone green token
pub fn green_token(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(raw_kind(kind), text)
}

/// Rewrite the trivia tokens of `node`, at any depth
///
/// `edit` sees every trivia token in source order. Non-trivia tokens (string
/// literals included, even when they span lines) are never offered. Returns
/// `None` when every call answered [`TriviaEdit::Keep`], in which case the
/// caller should keep using `node` itself.
pub fn map_trivia<F>(node: &GreenNodeData, edit: &mut F) -> Option<GreenNode>
where
    F: FnMut(SyntaxKind, &str) -> TriviaEdit,
{
    let mut rebuilt: Option<Vec<GreenElement>> = None;

    for (index, child) in node.children().enumerate() {
        let replacement: Option<Vec<GreenElement>> = match child {
            NodeOrToken::Node(inner) => {
                map_trivia(inner, edit).map(|inner| vec![NodeOrToken::Node(inner)])
            }
            NodeOrToken::Token(token) => {
                let kind = SyntaxKind::from_raw(token.kind().0).unwrap_or(SyntaxKind::Unknown);
                if kind.is_trivia() {
                    match edit(kind, token.text()) {
                        TriviaEdit::Keep => None,
                        TriviaEdit::InsertAfter(tokens) => Some(
                            std::iter::once(NodeOrToken::Token(token.to_owned()))
                                .chain(tokens.into_iter().map(NodeOrToken::Token))
                                .collect(),
                        ),
                        TriviaEdit::Replace(tokens) => {
                            Some(tokens.into_iter().map(NodeOrToken::Token).collect())
                        }
                    }
                } else {
                    None
                }
            }
        };

        match (replacement, rebuilt.as_mut()) {
            (Some(new_children), Some(children)) => children.extend(new_children),
            (Some(new_children), None) => {
                let mut children: Vec<GreenElement> =
                    node.children().take(index).map(owned_element).collect();
                children.extend(new_children);
                rebuilt = Some(children);
            }
            (None, Some(children)) => children.push(owned_element(child)),
            (None, None) => {}
        }
    }

    rebuilt.map(|children| GreenNode::new(node.kind(), children))
}

/// Length of the trivia before the first and after the last non-trivia
/// token owned directly by `node`
///
/// Only the root of a parse holds such trivia. A node made of trivia alone
/// reports all of it as leading and none as trailing.
pub fn outer_trivia_len(node: &GreenNodeData) -> (TextSize, TextSize) {
    let trivia_len = |child: NodeOrToken<&GreenNodeData, &rowan::GreenTokenData>| match child {
        NodeOrToken::Token(token) if is_trivia(token.kind()) => Some(token.text_len()),
        _ => None,
    };
    let leading = node
        .children()
        .map_while(trivia_len)
        .fold(TextSize::from(0), |total, len| total + len);
    if leading == node.text_len() {
        return (leading, TextSize::from(0));
    }
    let trailing = node
        .children()
        .rev()
        .map_while(trivia_len)
        .fold(TextSize::from(0), |total, len| total + len);
    (leading, trailing)
}

fn is_trivia(raw: rowan::SyntaxKind) -> bool {
    SyntaxKind::from_raw(raw.0).is_some_and(SyntaxKind::is_trivia)
}

fn owned_element(element: NodeOrToken<&GreenNodeData, &rowan::GreenTokenData>) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
    }
}

//! Rowan language implementation for weft
//!
//! Connects [`SyntaxKind`] to Rowan's generic CST infrastructure and names the
//! tree types used throughout the workspace.

use rowan::Language;

use crate::SyntaxKind;

/// Language implementation for weft
///
/// Zero-sized marker type implementing `rowan::Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeftLanguage;

impl Language for WeftLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::from_raw(raw.0).unwrap_or_else(|| {
            tracing::warn!(raw = raw.0, "unknown syntax kind");
            SyntaxKind::Unknown
        })
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A node in the weft concrete syntax tree
pub type SyntaxNode = rowan::SyntaxNode<WeftLanguage>;
/// A token (leaf) in the weft concrete syntax tree
pub type SyntaxToken = rowan::SyntaxToken<WeftLanguage>;
/// Either a node or a token
pub type SyntaxElement = rowan::SyntaxElement<WeftLanguage>;

/// Raw rowan kind for a `SyntaxKind`, for building green trees by hand
pub fn raw_kind(kind: SyntaxKind) -> rowan::SyntaxKind {
    WeftLanguage::kind_to_raw(kind)
}

/// Kind of a green node
pub fn green_kind(green: &rowan::GreenNodeData) -> SyntaxKind {
    WeftLanguage::kind_from_raw(green.kind())
}

/// Indented dump of a tree, one element per line, trivia included
///
/// Nodes print as `Kind@start..end`, tokens add their text.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(element) => {
                let range = element.text_range();
                out.push_str(&"  ".repeat(depth));
                out.push_str(&format!(
                    "{:?}@{}..{}",
                    element.kind(),
                    u32::from(range.start()),
                    u32::from(range.end())
                ));
                if let rowan::NodeOrToken::Token(token) = &element {
                    out.push_str(&format!(" {:?}", token.text()));
                }
                out.push('\n');
                depth += 1;
            }
            rowan::WalkEvent::Leave(_) => depth -= 1,
        }
    }
    out
}

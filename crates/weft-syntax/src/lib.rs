//! Weft Syntax
//!
//! Lossless concrete syntax trees for the weft statement language, built on
//! Rowan.
//!
//! ## Architecture
//!
//! - **Green tree**: immutable, position-independent, reference counted and
//!   `Send + Sync`. This is what gets stored, shared and spliced.
//! - **Red tree** ([`SyntaxNode`]): a cheap view over a green root with parent
//!   pointers and absolute offsets, created on demand for traversal.
//!
//! Every byte of the input, whitespace and comments included, ends up in the
//! tree, so `parse(source, entry).syntax_node().to_string() == source` holds for
//! any input and any entry point.
//!
//! ## Trivia placement
//!
//! A node spans from its first to its last non-trivia token; trivia between
//! two tokens belongs to the innermost node containing both. Only the root of
//! a parse owns the trivia before its first and after its last token.
//!
//! ## Example
//!
//! ```
//! use weft_syntax::{EntryPoint, SyntaxKind, parse};
//!
//! let result = parse("let x = 1 // one", EntryPoint::Decl);
//! assert!(!result.has_errors());
//!
//! let root = result.syntax_node();
//! assert_eq!(root.kind(), SyntaxKind::VariableDecl);
//! assert_eq!(root.to_string(), "let x = 1 // one");
//! ```

mod diagnostic;
mod grammar;
mod language;
mod syntax_kind;

pub mod ast;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod trivia;

pub use ast::{AstNode, SyntaxParse};
pub use diagnostic::{Diagnostic, Severity, text_range};
pub use keywords::{KEYWORDS, Keyword, KeywordSpec};
pub use language::{
    SyntaxElement, SyntaxNode, SyntaxToken, WeftLanguage, debug_tree, green_kind, raw_kind,
};
pub use parser::{EntryPoint, ParseResult, Parser, ParserConfig, WeftParser, parse};
pub use syntax_kind::SyntaxKind;

// Rowan types that show up in the public API
pub use rowan::{GreenNode, GreenNodeData, GreenToken, TextRange, TextSize};

//! Hand-written recursive descent parser for weft
//!
//! Builds a green tree straight from the trivia-preserving token stream.
//! Trivia placement follows one rule: a node spans from its first to its last
//! non-trivia token. Trivia seen before a node starts is flushed into the
//! enclosing node, trivia after a node's last token stays pending until the
//! next token is consumed. Only the root of a parse owns leading and trailing
//! trivia.

mod declarations;
mod expressions;
mod statements;

use crate::diagnostic::{Diagnostic, text_range, text_size};
use crate::language::raw_kind;
use crate::lexer::Token;
use crate::parser::EntryPoint;
use crate::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, NodeOrToken, TextRange};

pub(crate) struct GrammarParser<'t> {
    source: &'t str,
    tokens: Vec<Token<'t>>,
    /// First token not yet added to the tree (may be trivia)
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Vec<Diagnostic>,
    /// Non-trivia tokens consumed so far, for progress checks
    bumped: usize,
    depth: usize,
    max_depth: usize,
    depth_exceeded: bool,
}

impl<'t> GrammarParser<'t> {
    pub(crate) fn new(source: &'t str, tokens: Vec<Token<'t>>, max_depth: usize) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Vec::new(),
            bumped: 0,
            depth: 0,
            max_depth,
            depth_exceeded: false,
        }
    }

    pub(crate) fn parse(mut self, entry: EntryPoint) -> (GreenNode, Vec<Diagnostic>) {
        if entry == EntryPoint::SourceFile {
            self.builder.start_node(raw_kind(SyntaxKind::SourceFile));
            self.item_list(false);
            self.flush_trivia();
            self.builder.finish_node();
            let green = self.builder.finish();
            return (green, self.diagnostics);
        }

        let root = self.builder.checkpoint();
        match entry {
            EntryPoint::Item | EntryPoint::Stmt | EntryPoint::Decl | EntryPoint::SourceFile => {
                self.item_list(false)
            }
            EntryPoint::Expr => {
                self.expr();
                self.trailing_tokens("expression");
            }
            EntryPoint::CodeBlock => {
                self.code_block();
                self.trailing_tokens("code block");
            }
            EntryPoint::Type => {
                self.type_();
                self.trailing_tokens("type");
            }
            EntryPoint::Pattern => {
                self.pattern();
                self.trailing_tokens("pattern");
            }
        }
        self.flush_trivia();
        self.builder
            .start_node_at(root, raw_kind(SyntaxKind::CodeBlockItemList));
        self.builder.finish_node();

        let missing = self.missing_range();
        let list = self.builder.finish();
        let expected = match entry {
            EntryPoint::Item => Some("expected item"),
            EntryPoint::Stmt => Some("expected statement"),
            EntryPoint::Decl => Some("expected declaration"),
            _ => None,
        };
        if let Some(message) = expected {
            if list.children().all(|child| child.as_node().is_none()) {
                self.diagnostics.push(Diagnostic::error(message, missing));
            }
        }

        (hoist_single_node(list), self.diagnostics)
    }

    // ------------------------------------------------------------------
    // Token inspection
    // ------------------------------------------------------------------

    /// Index of the `n`-th non-trivia token from the cursor
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, token)| !token.kind.is_trivia())
            .nth(n)
            .map(|(index, _)| index)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|index| self.tokens[index].kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.nth_index(0)
            .is_some_and(|index| self.tokens[index].kind == SyntaxKind::Ident && self.tokens[index].text == text)
    }

    /// Whether a line break separates the current token from the previous one
    fn has_newline_before(&self) -> bool {
        let end = self.nth_index(0).unwrap_or(self.tokens.len());
        self.tokens[..end]
            .iter()
            .rev()
            .take_while(|token| token.kind.is_trivia())
            .any(|token| match token.kind {
                SyntaxKind::Newline => true,
                SyntaxKind::BlockComment => token.text.contains(['\n', '\r']),
                _ => false,
            })
    }

    /// Whether the token at `index` is glued to what precedes it
    fn left_bound(&self, index: usize) -> bool {
        index > 0
            && !matches!(
                self.tokens[index - 1].kind,
                SyntaxKind::Whitespace
                    | SyntaxKind::Newline
                    | SyntaxKind::LineComment
                    | SyntaxKind::BlockComment
                    | SyntaxKind::LParen
                    | SyntaxKind::LBracket
                    | SyntaxKind::LBrace
                    | SyntaxKind::Comma
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Colon
            )
    }

    /// Whether the token at `index` is glued to what follows it
    fn right_bound(&self, index: usize) -> bool {
        self.tokens.get(index + 1).is_some_and(|next| {
            !matches!(
                next.kind,
                SyntaxKind::Whitespace
                    | SyntaxKind::Newline
                    | SyntaxKind::LineComment
                    | SyntaxKind::BlockComment
                    | SyntaxKind::RParen
                    | SyntaxKind::RBracket
                    | SyntaxKind::RBrace
                    | SyntaxKind::Comma
                    | SyntaxKind::Semicolon
                    | SyntaxKind::Colon
                    | SyntaxKind::Period
            )
        })
    }

    /// Range of the current token, or an empty range at the end of input
    fn current_range(&self) -> TextRange {
        match self.nth_index(0) {
            Some(index) => text_range(self.tokens[index].span()),
            None => TextRange::empty(text_size(self.source.len())),
        }
    }

    /// Empty range right after the last consumed non-trivia token
    fn missing_range(&self) -> TextRange {
        let end = self.nth_index(0).unwrap_or(self.tokens.len());
        let offset = self.tokens[..end]
            .iter()
            .rev()
            .find(|token| !token.kind.is_trivia())
            .map(|token| token.offset + token.text.len())
            .unwrap_or(0);
        TextRange::empty(text_size(offset))
    }

    // ------------------------------------------------------------------
    // Tree building
    // ------------------------------------------------------------------

    fn flush_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(raw_kind(token.kind), token.text);
            self.pos += 1;
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(raw_kind(kind));
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, raw_kind(kind));
    }

    /// Consume the current token together with the trivia before it
    fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Consume the current token under a different kind (contextual keywords)
    fn bump_as(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(raw_kind(kind), token.text);
            self.pos += 1;
            self.bumped += 1;
        }
    }

    /// Wrap a single token in a node of `kind`
    fn token_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    fn expect_with(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_at(self.missing_range(), message);
            false
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics and recovery
    // ------------------------------------------------------------------

    fn error_at(&mut self, range: TextRange, message: impl Into<String>) {
        // Everything after an overflow is already one error node
        if self.depth_exceeded {
            return;
        }
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    fn warning_at(&mut self, range: TextRange, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(message, range));
    }

    fn error_missing(&mut self, message: &str) {
        self.error_at(self.missing_range(), message);
    }

    /// Report the current token and wrap it in an `Error` node
    fn error_and_bump(&mut self, message: &str) {
        if self.at(SyntaxKind::Eof) {
            self.error_missing(message);
            return;
        }
        // The lexer already reported characters it could not classify
        if !self.at(SyntaxKind::Unknown) {
            self.error_at(self.current_range(), message);
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    /// Everything left after a single-production entry point is an error
    fn trailing_tokens(&mut self, what: &str) {
        if self.at(SyntaxKind::Eof) {
            return;
        }
        let start = self.current_range().start();
        self.start_node(SyntaxKind::Error);
        while !self.at(SyntaxKind::Eof) {
            self.bump();
        }
        self.finish_node();
        let end = self.missing_range().end();
        self.error_at(TextRange::new(start, end), format!("unexpected code after {what}"));
    }

    /// Track nesting; returns `false` once the limit is hit
    ///
    /// On overflow the rest of the input becomes a single `Error` node, so
    /// every production still on the stack sees the end of input.
    fn enter(&mut self) -> bool {
        if self.depth_exceeded {
            return false;
        }
        if self.depth >= self.max_depth {
            let range = self.current_range();
            self.error_at(
                range,
                format!("nesting exceeds the maximum depth of {}", self.max_depth),
            );
            self.depth_exceeded = true;
            self.start_node(SyntaxKind::Error);
            while let Some(token) = self.tokens.get(self.pos) {
                self.builder.token(raw_kind(token.kind), token.text);
                self.pos += 1;
            }
            self.finish_node();
            return false;
        }
        self.depth += 1;
        true
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------
    // Item lists
    // ------------------------------------------------------------------

    /// Items separated by line breaks or `;`, up to `}` when `nested`
    fn item_list(&mut self, nested: bool) {
        let mut needs_separator = false;
        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                SyntaxKind::RBrace if nested => break,
                SyntaxKind::Semicolon => {
                    self.semicolon();
                    needs_separator = false;
                    continue;
                }
                SyntaxKind::RBrace => {
                    self.error_and_bump("extraneous '}' at top level");
                    continue;
                }
                _ => {}
            }

            if needs_separator && !self.has_newline_before() {
                self.error_missing("consecutive statements on a line must be separated by ';'");
            }

            let before = self.bumped;
            self.item();
            if self.bumped == before {
                let message = format!("unexpected {}", self.current().describe());
                self.error_and_bump(&message);
            }
            needs_separator = true;
        }
    }

    fn semicolon(&mut self) {
        let range = self.current_range();
        self.bump();
        let ends_line = matches!(self.current(), SyntaxKind::Eof | SyntaxKind::RBrace)
            || self.has_newline_before();
        if ends_line {
            self.warning_at(range, "trailing ';' is redundant");
        }
    }
}

/// Give a single-production parse its root
///
/// The builder wraps everything in a `CodeBlockItemList`. When that list
/// holds exactly one node, the node becomes the root and takes over the
/// surrounding tokens (outer trivia, a trailing `;`). With no node at all
/// the root is an `Error` node holding the tokens.
fn hoist_single_node(list: GreenNode) -> GreenNode {
    let mut leading = Vec::new();
    let mut trailing = Vec::new();
    let mut inner = None;
    let mut nodes = 0;

    for child in list.children() {
        match child {
            NodeOrToken::Node(node) => {
                nodes += 1;
                inner = Some(node);
            }
            NodeOrToken::Token(token) if inner.is_none() => {
                leading.push(NodeOrToken::Token(token.to_owned()));
            }
            NodeOrToken::Token(token) => {
                trailing.push(NodeOrToken::Token(token.to_owned()));
            }
        }
    }

    match (nodes, inner) {
        (0, _) => GreenNode::new(raw_kind(SyntaxKind::Error), leading),
        (1, Some(node)) if leading.is_empty() && trailing.is_empty() => node.to_owned(),
        (1, Some(node)) => {
            let children = leading
                .into_iter()
                .chain(node.children().map(|child| match child {
                    NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
                    NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
                }))
                .chain(trailing)
                .collect::<Vec<_>>();
            GreenNode::new(node.kind(), children)
        }
        _ => list,
    }
}

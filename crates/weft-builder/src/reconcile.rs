//! Parse a finished template and put its fragments back
//!
//! The finished text is parsed from scratch with the production of the
//! requested node type. Parsing alone would give fresh copies of every
//! spliced fragment; reconciliation swaps each of them for the fragment the
//! caller passed in, so the result shares those sub-trees by reference.
//!
//! A fragment is put back where the fresh tree has a node with exactly the
//! fragment's byte range and root kind. A fragment whose root carries leading
//! or trailing trivia (a trailing comment, a final line break) matches the
//! node spanning its text without that trivia; the trivia tokens the parser
//! gave to enclosing nodes are cut out and the fragment brings its own, so
//! the text stays byte for byte the same.
//!
//! When the surrounding text changes how the fragment parses (operator
//! precedence) there is no such node and the parsed text stays; the tree
//! always means what its text says.

use crate::config::BuilderConfig;
use crate::diagnostics::DiagnosticsFormatter;
use crate::error::{Result, TemplateError};
use crate::interpolation::FinishedTemplate;
use crate::registry::FragmentRecord;
use rowan::{GreenNode, NodeOrToken, TextRange, TextSize};
use std::ops::Range;
use weft_syntax::trivia::{green_token, outer_trivia_len};
use weft_syntax::{Parser, SyntaxKind, SyntaxNode, SyntaxParse, WeftParser, green_kind};

/// Drives a parser over finished templates
#[derive(Debug, Clone)]
pub struct Reconciler<P = WeftParser> {
    parser: P,
    formatter: DiagnosticsFormatter,
}

impl Reconciler<WeftParser> {
    pub fn new(config: &BuilderConfig) -> Self {
        Self {
            parser: WeftParser::new(config.parser),
            formatter: DiagnosticsFormatter::new(&config.diagnostics),
        }
    }
}

impl Default for Reconciler<WeftParser> {
    fn default() -> Self {
        Self::new(&BuilderConfig::default())
    }
}

impl<P: Parser> Reconciler<P> {
    /// Use another parser, keeping the diagnostics settings
    pub fn with_parser<Q: Parser>(self, parser: Q) -> Reconciler<Q> {
        Reconciler {
            parser,
            formatter: self.formatter,
        }
    }

    pub fn with_formatter(mut self, formatter: DiagnosticsFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Parse `template` as a `T`, restoring its fragments
    pub fn reconcile<T: SyntaxParse>(&self, template: FinishedTemplate) -> Result<T> {
        let (source, fragments) = template.into_parts();
        let parsed = self.parser.parse(&source, T::ENTRY);

        for diagnostic in parsed.diagnostics.iter().filter(|d| !d.is_error()) {
            tracing::debug!(
                severity = %diagnostic.severity,
                range = ?diagnostic.range,
                "{}",
                diagnostic.message
            );
        }

        if parsed.has_errors() {
            let tree = SyntaxNode::new_root(parsed.green.clone());
            let rendered = self.formatter.annotated_source(&tree, &parsed.diagnostics);
            tracing::debug!(
                errors = parsed.errors().count(),
                expected = T::NAME,
                "template failed to parse"
            );
            return Err(TemplateError::ParseDiagnostics {
                diagnostics: parsed.diagnostics,
                tree: parsed.green,
                rendered,
            });
        }

        let mut green = parsed.green;
        for record in &fragments {
            green = splice(green, record);
        }

        let root = SyntaxNode::new_root(green.clone());
        T::cast(root).ok_or_else(|| TemplateError::TypeMismatch {
            expected: T::NAME,
            actual: green_kind(&green),
            tree: green,
        })
    }
}

/// Replace the node matching `record` in `green`, if there is one
fn splice(green: GreenNode, record: &FragmentRecord) -> GreenNode {
    let kind = record.kind();
    if record.range.is_empty() {
        tracing::debug!(?kind, range = ?record.range, "empty fragment left as parsed");
        return green;
    }

    let root = SyntaxNode::new_root(green.clone());
    if let Some(node) = matching_node(&root, record.range, kind) {
        tracing::trace!(?kind, range = ?record.range, "restored fragment");
        return node.replace_with(record.green.clone());
    }

    match splice_without_outer_trivia(&green, record) {
        Some(spliced) => {
            tracing::trace!(?kind, range = ?record.range, "restored fragment with its outer trivia");
            spliced
        }
        None => {
            tracing::debug!(
                ?kind,
                range = ?record.range,
                "no node matches fragment, left as parsed"
            );
            green
        }
    }
}

/// Restore a fragment whose root owns trivia around its text
///
/// In the fresh tree that trivia belongs to enclosing nodes, and the node to
/// replace spans only the fragment's text without it.
fn splice_without_outer_trivia(green: &GreenNode, record: &FragmentRecord) -> Option<GreenNode> {
    let kind = record.kind();
    let (leading, trailing) = outer_trivia_len(&record.green);
    let outer = leading + trailing;
    if outer == TextSize::from(0) || outer >= record.range.len() {
        return None;
    }

    let start = record.range.start();
    let inner = TextRange::new(start + leading, record.range.end() - trailing);
    let root = SyntaxNode::new_root(green.clone());
    if !root.text_range().contains_range(record.range) {
        return None;
    }
    matching_node(&root, inner, kind)?;

    // Trailing first, leading offsets stay valid
    let green = remove_trivia(green.clone(), TextRange::new(inner.end(), record.range.end()))?;
    let green = remove_trivia(green, TextRange::new(start, inner.start()))?;

    let root = SyntaxNode::new_root(green);
    let node = matching_node(&root, TextRange::at(start, inner.len()), kind)?;
    Some(node.replace_with(record.green.clone()))
}

/// Cut the bytes of `range` out of the tree
///
/// Every token overlapping the range has to be trivia. Whitespace reaching
/// past the range is shortened; other trivia must lie inside it.
fn remove_trivia(mut green: GreenNode, range: TextRange) -> Option<GreenNode> {
    let mut remaining = range;
    while !remaining.is_empty() {
        let root = SyntaxNode::new_root(green);
        let token = root.token_at_offset(remaining.start()).right_biased()?;
        let kind = token.kind();
        let token_range = token.text_range();
        let cut = token_range.intersect(remaining).filter(|cut| !cut.is_empty())?;
        if !kind.is_trivia() || (cut != token_range && kind != SyntaxKind::Whitespace) {
            return None;
        }

        let mut text = token.text().to_string();
        text.replace_range(Range::<usize>::from(cut - token_range.start()), "");
        green = if text.is_empty() {
            let parent = token.parent()?;
            parent.replace_with(parent.green().remove_child(token.index()))
        } else {
            token.replace_with(green_token(kind, &text))
        };
        remaining = TextRange::new(remaining.start(), remaining.end() - cut.len());
    }
    Some(green)
}

/// Innermost node spanning exactly `range` with the given kind
fn matching_node(root: &SyntaxNode, range: TextRange, kind: SyntaxKind) -> Option<SyntaxNode> {
    // A custom parser may hand back a tree for other text
    if !root.text_range().contains_range(range) {
        return None;
    }
    let start = match root.covering_element(range) {
        NodeOrToken::Node(node) => node,
        NodeOrToken::Token(token) => token.parent()?,
    };

    // Ancestors only grow, so the exact matches form a prefix of the chain
    start
        .ancestors()
        .take_while(|node| node.text_range() == range)
        .find(|node| node.kind() == kind)
}

/// Build typed nodes from templates
///
/// Implemented for every node type that can be parsed on its own. The
/// `try_` functions report problems; the others are for templates that are
/// well-formed by construction and panic at the caller otherwise.
pub trait FromTemplate: SyntaxParse {
    fn try_from_template(template: impl Into<FinishedTemplate>) -> Result<Self> {
        Reconciler::new(&BuilderConfig::default()).reconcile(template.into())
    }

    fn try_from_source(source: &str) -> Result<Self> {
        Self::try_from_template(FinishedTemplate::from_source(source))
    }

    #[track_caller]
    fn from_template(template: impl Into<FinishedTemplate>) -> Self {
        match Self::try_from_template(template) {
            Ok(node) => node,
            Err(error) => panic!(
                "failed to build {} from template {:?}: {error}",
                Self::NAME,
                SyntaxNode::new_root(error.tree().clone()).to_string()
            ),
        }
    }

    #[track_caller]
    fn from_source(source: &str) -> Self {
        Self::from_template(FinishedTemplate::from_source(source))
    }
}

impl<T: SyntaxParse> FromTemplate for T {}

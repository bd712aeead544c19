//! Entry-point parser
//!
//! Parses source text with a chosen production into a lossless green tree and
//! a list of diagnostics. Parsing never fails: malformed input ends up in
//! `Error` nodes and the tree always reproduces the input byte for byte.

use crate::SyntaxNode;
use crate::diagnostic::{Diagnostic, Severity};
use crate::grammar::GrammarParser;
use crate::lexer::lex_with_trivia;
use rowan::GreenNode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The grammar production a parse starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPoint {
    /// A whole file: any number of items
    SourceFile,
    /// One statement, declaration or expression
    Item,
    Stmt,
    Decl,
    Expr,
    /// A braced block
    CodeBlock,
    Type,
    Pattern,
}

impl EntryPoint {
    pub const ALL: &'static [EntryPoint] = &[
        EntryPoint::SourceFile,
        EntryPoint::Item,
        EntryPoint::Stmt,
        EntryPoint::Decl,
        EntryPoint::Expr,
        EntryPoint::CodeBlock,
        EntryPoint::Type,
        EntryPoint::Pattern,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryPoint::SourceFile => "source-file",
            EntryPoint::Item => "item",
            EntryPoint::Stmt => "stmt",
            EntryPoint::Decl => "decl",
            EntryPoint::Expr => "expr",
            EntryPoint::CodeBlock => "code-block",
            EntryPoint::Type => "type",
            EntryPoint::Pattern => "pattern",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryPoint::ALL
            .iter()
            .copied()
            .find(|entry| entry.as_str() == s)
            .ok_or_else(|| format!("unknown entry point '{s}'"))
    }
}

/// Parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Deepest nesting of items, expressions, types and patterns accepted
    #[schemars(description = "Maximum nesting depth before the parser gives up on the rest of the input")]
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 256,
        }
    }
}

/// Outcome of a parse: the tree plus everything worth reporting about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub green: GreenNode,
    /// Sorted by position in the source
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// A fresh red tree over the green root
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
    }
}

/// A parser that can turn source text into a weft tree
pub trait Parser {
    fn parse(&self, source: &str, entry: EntryPoint) -> ParseResult;
}

/// The weft grammar
#[derive(Debug, Clone, Default)]
pub struct WeftParser {
    config: ParserConfig,
}

impl WeftParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl Parser for WeftParser {
    fn parse(&self, source: &str, entry: EntryPoint) -> ParseResult {
        let (tokens, lexer_errors) = lex_with_trivia(source);
        tracing::trace!(%entry, tokens = tokens.len(), "parsing");

        let parser = GrammarParser::new(source, tokens, self.config.max_nesting_depth);
        let (green, mut diagnostics) = parser.parse(entry);

        diagnostics.extend(
            lexer_errors
                .into_iter()
                .map(|error| Diagnostic::error(error.message, crate::text_range(error.span))),
        );
        diagnostics.sort_by_key(|diagnostic| diagnostic.range.start());

        ParseResult { green, diagnostics }
    }
}

/// Parse `source` with the default parser configuration
pub fn parse(source: &str, entry: EntryPoint) -> ParseResult {
    WeftParser::default().parse(source, entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_names() {
        for entry in EntryPoint::ALL {
            assert_eq!(entry.as_str().parse::<EntryPoint>(), Ok(*entry));
        }
        assert!("statement".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn test_lossless_on_garbage() {
        let source = "let = = ) } @ \"open";
        let result = parse(source, EntryPoint::SourceFile);
        assert_eq!(result.syntax_node().to_string(), source);
        assert!(result.has_errors());
    }

    #[test]
    fn test_diagnostics_sorted() {
        let result = parse("@ let x = (", EntryPoint::SourceFile);
        let starts: Vec<_> = result.diagnostics.iter().map(|d| d.range.start()).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(result.diagnostics[0].message, "unexpected character '@'");
    }
}

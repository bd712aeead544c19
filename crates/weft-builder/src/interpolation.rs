//! Template assembly
//!
//! A [`Template`] accumulates source text from literals, rendered values and
//! existing syntax fragments. Fragments are re-indented to the whitespace
//! that precedes them and recorded together with the byte range their text
//! occupies, so that the reconciler can put the very same fragment back into
//! the tree it parses from the finished text.
//!
//! ```
//! use weft_builder::Template;
//! use weft_syntax::{EntryPoint, parse};
//!
//! let body = parse("if ready {\n  go()\n}", EntryPoint::Stmt).green;
//!
//! let mut template = Template::new();
//! template.append_literal("func run() {\n    ");
//! template.append_green(&body);
//! template.append_literal("\n}");
//!
//! let finished = template.finish();
//! assert_eq!(
//!     finished.source(),
//!     "func run() {\n    if ready {\n      go()\n    }\n}"
//! );
//! assert_eq!(finished.fragments().len(), 1);
//! ```

use crate::config::BuilderConfig;
use crate::indent::Indenter;
use crate::registry::{FragmentRecord, FragmentRegistry};
use rowan::{GreenNode, GreenNodeData, NodeOrToken, TextRange, TextSize};
use std::borrow::Cow;
use std::fmt;
use weft_syntax::{AstNode, Keyword, SyntaxNode};

/// Indentation unit found at the end of the last appended literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indentation {
    Spaces(usize),
    Tabs(usize),
}

impl Indentation {
    /// Indentation of the last line of `text`
    ///
    /// Line breaks are `\n`, `\r\n` and `\r`; empty lines do not count. The
    /// last line has to consist of spaces only or tabs only.
    pub fn of_last_line(text: &str) -> Option<Self> {
        let last_line = text
            .split(['\n', '\r'])
            .filter(|line| !line.is_empty())
            .last()?;

        if last_line.bytes().all(|b| b == b' ') {
            Some(Indentation::Spaces(last_line.len()))
        } else if last_line.bytes().all(|b| b == b'\t') {
            Some(Indentation::Tabs(last_line.len()))
        } else {
            None
        }
    }

    pub fn to_text(self) -> String {
        match self {
            Indentation::Spaces(count) => " ".repeat(count),
            Indentation::Tabs(count) => "\t".repeat(count),
        }
    }
}

/// Append-only UTF-8 source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
        }
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append the text of a green tree
    pub fn push_green(&mut self, node: &GreenNodeData) {
        for child in node.children() {
            match child {
                NodeOrToken::Node(inner) => self.push_green(inner),
                NodeOrToken::Token(token) => self.text.push_str(token.text()),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Current end of the text as a tree offset
    pub fn end(&self) -> TextSize {
        TextSize::try_from(self.text.len()).unwrap_or(TextSize::from(u32::MAX))
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// A template being built
///
/// Appends happen in order; [`Template::finish`] freezes the text and hands
/// it to the reconciler.
#[derive(Debug, Clone)]
pub struct Template {
    buffer: SourceBuffer,
    indentation: Option<Indentation>,
    fragments: FragmentRegistry,
    propagate_indentation: bool,
}

impl Template {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Reserve room for `literal_capacity` bytes of text and
    /// `interpolation_count` fragments
    pub fn with_capacity(literal_capacity: usize, interpolation_count: usize) -> Self {
        Self {
            buffer: SourceBuffer::with_capacity(literal_capacity),
            indentation: None,
            fragments: FragmentRegistry::with_capacity(interpolation_count),
            propagate_indentation: true,
        }
    }

    pub fn with_config(config: &BuilderConfig) -> Self {
        let mut template = Self::new();
        template.propagate_indentation = config.indentation.propagate;
        template
    }

    /// Append literal source text
    pub fn append_literal(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self.indentation = Indentation::of_last_line(text);
        self
    }

    /// Append a rendered value as literal source text
    pub fn append_text<T: TextRenderable + ?Sized>(&mut self, value: &T) -> &mut Self {
        let mut text = String::new();
        value.render(&mut text);
        self.append_literal(&text)
    }

    /// Splice a typed syntax fragment
    pub fn append_fragment<N: AstNode>(&mut self, node: &N) -> &mut Self {
        self.append_syntax(node.syntax())
    }

    /// Splice an untyped syntax fragment
    pub fn append_syntax(&mut self, node: &SyntaxNode) -> &mut Self {
        let green = node.green().into_owned();
        self.append_green(&green)
    }

    /// Splice a green tree, for example one shared between threads
    pub fn append_green(&mut self, green: &GreenNode) -> &mut Self {
        let fragment = match self.indentation.take() {
            Some(indentation) if self.propagate_indentation => {
                Indenter::new(indentation).indent(green)
            }
            _ => green.clone(),
        };

        let start = self.buffer.end();
        self.buffer.push_green(&fragment);
        let end = self.buffer.end();

        tracing::trace!(kind = ?weft_syntax::green_kind(&fragment), ?start, ?end, "spliced fragment");
        self.fragments.push(fragment, TextRange::new(start, end));
        self
    }

    /// Text assembled so far
    pub fn source(&self) -> &str {
        self.buffer.as_str()
    }

    /// Indentation the next fragment would receive
    pub fn indentation(&self) -> Option<Indentation> {
        self.indentation
    }

    pub fn fragments(&self) -> &[FragmentRecord] {
        self.fragments.as_slice()
    }

    /// Freeze the template
    pub fn finish(self) -> FinishedTemplate {
        FinishedTemplate {
            source: self.buffer.into_string(),
            fragments: self.fragments,
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen template, ready to be parsed and reconciled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedTemplate {
    source: String,
    fragments: FragmentRegistry,
}

impl FinishedTemplate {
    /// A template with no fragments
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fragments: FragmentRegistry::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    pub fn into_parts(self) -> (String, FragmentRegistry) {
        (self.source, self.fragments)
    }
}

impl From<Template> for FinishedTemplate {
    fn from(template: Template) -> Self {
        template.finish()
    }
}

impl From<&str> for FinishedTemplate {
    fn from(source: &str) -> Self {
        Self::from_source(source)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Values that can be written into a template as plain source text
///
/// Implemented for strings, characters, booleans, numbers and keywords, and
/// for references to them. Syntax nodes are spliced as fragments instead.
pub trait TextRenderable: sealed::Sealed {
    fn render(&self, out: &mut String);
}

macro_rules! renderable_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl TextRenderable for $ty {
                fn render(&self, out: &mut String) {
                    use fmt::Write;
                    // Writing into a String cannot fail
                    let _ = write!(out, "{self}");
                }
            }
        )*
    };
}

renderable_via_display!(
    char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl sealed::Sealed for str {}

impl TextRenderable for str {
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl sealed::Sealed for String {}

impl TextRenderable for String {
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl sealed::Sealed for Cow<'_, str> {}

impl TextRenderable for Cow<'_, str> {
    fn render(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl sealed::Sealed for Keyword {}

/// Keywords render with the spacing they require
impl TextRenderable for Keyword {
    fn render(&self, out: &mut String) {
        out.push_str(&self.spaced_text());
    }
}

impl<T: sealed::Sealed + ?Sized> sealed::Sealed for &T {}

impl<T: TextRenderable + ?Sized> TextRenderable for &T {
    fn render(&self, out: &mut String) {
        (**self).render(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::ast::ArrayExpr;
    use weft_syntax::{EntryPoint, parse};

    #[test]
    fn test_indentation_of_last_line() {
        assert_eq!(Indentation::of_last_line("    "), Some(Indentation::Spaces(4)));
        assert_eq!(Indentation::of_last_line("x {\n\t\t"), Some(Indentation::Tabs(2)));
        assert_eq!(Indentation::of_last_line("a\r\n  "), Some(Indentation::Spaces(2)));
        assert_eq!(Indentation::of_last_line("a\r   "), Some(Indentation::Spaces(3)));
        assert_eq!(Indentation::of_last_line("  \n"), Some(Indentation::Spaces(2)));
        assert_eq!(Indentation::of_last_line("\n"), None);
        assert_eq!(Indentation::of_last_line(""), None);
        assert_eq!(Indentation::of_last_line("if x {\n"), None);
        assert_eq!(Indentation::of_last_line(" \t"), None);
        assert_eq!(Indentation::of_last_line("return "), None);
    }

    #[test]
    fn test_records_cover_fragment_text() {
        let call = parse("f(x)", EntryPoint::Expr).green;
        let mut template = Template::new();
        template
            .append_literal("let y = ")
            .append_green(&call)
            .append_literal(" + ")
            .append_green(&call);

        assert_eq!(template.source(), "let y = f(x) + f(x)");
        let ranges: Vec<_> = template.fragments().iter().map(|r| r.range).collect();
        assert_eq!(
            ranges,
            vec![weft_syntax::text_range(8..12), weft_syntax::text_range(15..19)]
        );
        for record in template.fragments() {
            assert!(std::ptr::eq(&*record.green, &*call));
        }
    }

    #[test]
    fn test_fragment_clears_indentation() {
        let array = parse("[\n1,\n2\n]", EntryPoint::Expr).syntax_node();
        let array = ArrayExpr::cast(array).unwrap();

        let mut template = Template::new();
        template.append_literal("    ");
        assert_eq!(template.indentation(), Some(Indentation::Spaces(4)));
        template.append_fragment(&array);
        assert_eq!(template.indentation(), None);
        template.append_fragment(&array);

        assert_eq!(template.source(), "    [\n    1,\n    2\n    ][\n1,\n2\n]");
    }

    #[test]
    fn test_propagation_disabled() {
        let mut config = BuilderConfig::default();
        config.indentation.propagate = false;
        let block = parse("{\nx\n}", EntryPoint::CodeBlock).green;

        let mut template = Template::with_config(&config);
        template.append_literal("  ").append_green(&block);
        assert_eq!(template.source(), "  {\nx\n}");
    }

    #[test]
    fn test_append_text_is_a_literal() {
        let mut template = Template::new();
        template
            .append_text(&Keyword::Return)
            .append_text(&42u8)
            .append_text("\n")
            .append_text(&String::from("  "));
        assert_eq!(template.source(), "return 42\n  ");
        assert_eq!(template.indentation(), Some(Indentation::Spaces(2)));
        assert!(template.fragments().is_empty());

        template.append_text(&Cow::Borrowed("x")).append_text(&'!').append_text(&true);
        assert_eq!(template.source(), "return 42\n  x!true");
        assert_eq!(template.indentation(), None);
    }

    #[test]
    fn test_finish_keeps_text_and_records() {
        let name = parse("value", EntryPoint::Expr).green;
        let mut template = Template::with_capacity(16, 1);
        template.append_literal("return ").append_green(&name);

        let finished: FinishedTemplate = template.into();
        let (source, fragments) = finished.into_parts();
        assert_eq!(source, "return value");
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments.as_slice()[0].range, weft_syntax::text_range(7..12));
    }
}

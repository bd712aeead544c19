//! Parser diagnostics rendered against the source they point into
//!
//! Each diagnostic becomes a header, a location line and a small code frame
//! with carets under the offending range:
//!
//! ```text
//! error: expected '}' to end code block
//!  --> 1:12
//!   |
//! 1 | if x == 1 {
//!   |            ^
//! ```

use crate::config::DiagnosticsConfig;
use crate::console::{Color, Console};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_width::UnicodeWidthChar;
use weft_syntax::{Diagnostic, Severity, SyntaxNode};

/// When rendered diagnostics use ANSI colors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset
    Auto,
    Always,
    #[default]
    Never,
}

impl ColorChoice {
    fn console(self) -> Console {
        match self {
            ColorChoice::Auto => Console::new(),
            ColorChoice::Always => Console::colored(),
            ColorChoice::Never => Console::no_colors(),
        }
    }
}

/// Rendered diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDiagnostics {
    text: String,
}

impl FormattedDiagnostics {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for FormattedDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Renders diagnostics with source context
#[derive(Debug, Clone)]
pub struct DiagnosticsFormatter {
    context_lines: usize,
    console: Console,
    origin: Option<String>,
}

impl DiagnosticsFormatter {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self {
            context_lines: config.context_lines,
            console: config.color().console(),
            origin: None,
        }
    }

    /// Number of lines shown before the line a diagnostic points at
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.console = color.console();
        self
    }

    /// Name shown in front of line and column, usually a file path
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Render `diagnostics` against the text of `tree`, in source order
    pub fn annotated_source(
        &self,
        tree: &SyntaxNode,
        diagnostics: &[Diagnostic],
    ) -> FormattedDiagnostics {
        let source = tree.to_string();
        let lines = LineIndex::new(&source);

        let mut ordered: Vec<&Diagnostic> = diagnostics.iter().collect();
        ordered.sort_by_key(|diagnostic| (diagnostic.range.start(), diagnostic.range.end()));

        let text = ordered
            .into_iter()
            .map(|diagnostic| self.render_one(&source, &lines, diagnostic))
            .collect::<Vec<_>>()
            .join("\n\n");

        FormattedDiagnostics { text }
    }

    fn render_one(&self, source: &str, lines: &LineIndex, diagnostic: &Diagnostic) -> String {
        let start = clamp_offset(source, u32::from(diagnostic.range.start()) as usize);
        let end = clamp_offset(source, u32::from(diagnostic.range.end()) as usize).max(start);

        let line = lines.line_of(start);
        let line_text = lines.text(source, line);
        let line_start = lines.start(line);
        let prefix = &source[line_start..start];
        let column = display_width(prefix) + 1;

        let first_line = line.saturating_sub(self.context_lines);
        let gutter_width = (line + 1).to_string().len();
        let pad = " ".repeat(gutter_width);
        let bar = self.console.colorize("|", Color::Blue);
        let color = severity_color(diagnostic.severity);

        let mut out = String::new();

        // Header: severity: message
        out.push_str(&self.console.colorize(&diagnostic.severity.to_string(), color));
        out.push_str(": ");
        out.push_str(&self.console.colorize(&diagnostic.message, Color::Bold));
        out.push('\n');

        let location = match &self.origin {
            Some(origin) => format!("{origin}:{}:{column}", line + 1),
            None => format!("{}:{column}", line + 1),
        };
        out.push_str(&format!(
            "{pad}{} {location}\n",
            self.console.colorize("-->", Color::Blue)
        ));
        out.push_str(&format!("{pad} {bar}\n"));

        for number in first_line..=line {
            let text = lines.text(source, number);
            let label = self
                .console
                .colorize(&format!("{:>gutter_width$}", number + 1), Color::Blue);
            if text.is_empty() {
                out.push_str(&format!("{label} {bar}\n"));
            } else {
                out.push_str(&format!("{label} {bar} {text}\n"));
            }
        }

        // Carets under the range, clipped to the line
        let highlighted = &source[start..end.min(line_start + line_text.len()).max(start)];
        let carets = "^".repeat(display_width(highlighted).max(1));
        out.push_str(&format!(
            "{pad} {bar} {}{}",
            caret_padding(prefix),
            self.console.colorize(&carets, color)
        ));

        out
    }
}

impl Default for DiagnosticsFormatter {
    fn default() -> Self {
        Self::new(&DiagnosticsConfig::default())
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Note => Color::Cyan,
    }
}

fn clamp_offset(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn char_width(c: char) -> usize {
    // Control characters, tabs included, take one column
    c.width().unwrap_or(1)
}

fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Blank space as wide as `prefix`, keeping its tabs so carets line up
fn caret_padding(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| {
            if c == '\t' {
                "\t".to_string()
            } else {
                " ".repeat(char_width(c))
            }
        })
        .collect()
}

/// Start offsets of the lines of a text
///
/// `\n`, `\r\n` and `\r` end a line. A text ending in a line break has a final
/// empty line.
struct LineIndex {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        let mut ends = Vec::new();
        let mut index = 0;
        while index < bytes.len() {
            match bytes[index] {
                b'\n' => {
                    ends.push(index);
                    starts.push(index + 1);
                }
                b'\r' => {
                    ends.push(index);
                    if bytes.get(index + 1) == Some(&b'\n') {
                        index += 1;
                    }
                    starts.push(index + 1);
                }
                _ => {}
            }
            index += 1;
        }
        ends.push(source.len());
        Self { starts, ends }
    }

    /// Zero-based line containing `offset`
    fn line_of(&self, offset: usize) -> usize {
        self.starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    fn start(&self, line: usize) -> usize {
        self.starts[line]
    }

    fn text<'s>(&self, source: &'s str, line: usize) -> &'s str {
        &source[self.starts[line]..self.ends[line]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::{EntryPoint, parse, text_range};

    fn render(source: &str, entry: EntryPoint) -> String {
        let result = parse(source, entry);
        DiagnosticsFormatter::default()
            .annotated_source(&result.syntax_node(), &result.diagnostics)
            .into_string()
    }

    #[test]
    fn test_missing_brace() {
        insta::assert_snapshot!(render("if x == 1 {", EntryPoint::Stmt), @r"
        error: expected '}' to end code block
         --> 1:12
          |
        1 | if x == 1 {
          |            ^
        ");
    }

    #[test]
    fn test_context_lines_and_wide_gutter() {
        let source = "let a = 1\nlet b = 2\nlet c = 3\nlet d = 4\nlet e = 5\nlet f = 6\nlet g = 7\nlet h = 8\nlet i = 9\nlet j = \"open";
        insta::assert_snapshot!(render(source, EntryPoint::SourceFile), @r#"
        error: unterminated string literal
          --> 10:9
           |
         8 | let h = 8
         9 | let i = 9
        10 | let j = "open
           |         ^^^^^
        "#);
    }

    #[test]
    fn test_source_order_and_warning() {
        insta::assert_snapshot!(render("a b;\n", EntryPoint::SourceFile), @r"
        error: consecutive statements on a line must be separated by ';'
         --> 1:2
          |
        1 | a b;
          |  ^

        warning: trailing ';' is redundant
         --> 1:4
          |
        1 | a b;
          |    ^
        ");
    }

    #[test]
    fn test_columns_use_display_width() {
        let tree = parse("let 名前 = 1\n", EntryPoint::SourceFile).syntax_node();
        let diagnostic = Diagnostic::error("look here", text_range(11..12));
        let rendered = DiagnosticsFormatter::default()
            .with_origin("wide.weft")
            .annotated_source(&tree, &[diagnostic]);
        insta::assert_snapshot!(rendered.as_str(), @r"
        error: look here
         --> wide.weft:1:10
          |
        1 | let 名前 = 1
          |          ^
        ");
    }

    #[test]
    fn test_range_clipped_to_line() {
        let tree = parse("f(\n1)", EntryPoint::Expr).syntax_node();
        let diagnostic = Diagnostic::error("spans lines", text_range(0..5));
        let rendered = DiagnosticsFormatter::default()
            .with_context_lines(0)
            .annotated_source(&tree, &[diagnostic]);
        insta::assert_snapshot!(rendered.as_str(), @r"
        error: spans lines
         --> 1:1
          |
        1 | f(
          | ^^
        ");
    }

    #[test]
    fn test_colors() {
        let tree = parse("x", EntryPoint::Expr).syntax_node();
        let diagnostic = Diagnostic::warning("w", text_range(0..1));
        let rendered = DiagnosticsFormatter::default()
            .with_color(ColorChoice::Always)
            .annotated_source(&tree, &[diagnostic]);
        assert!(rendered.as_str().starts_with("\x1b[33mwarning\x1b[0m: \x1b[1mw\x1b[0m\n"));
    }

    #[test]
    fn test_no_diagnostics() {
        let tree = parse("x", EntryPoint::Expr).syntax_node();
        assert!(DiagnosticsFormatter::default().annotated_source(&tree, &[]).is_empty());
    }

    #[test]
    fn test_line_index() {
        let source = "a\r\nb\rc\n";
        let index = LineIndex::new(source);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(5), 2);
        assert_eq!(index.line_of(7), 3);
        assert_eq!(index.text(source, 0), "a");
        assert_eq!(index.text(source, 2), "c");
        assert_eq!(index.text(source, 3), "");
    }
}

//! Output formatting for parse results

use serde::Serialize;
use weft_syntax::{Diagnostic, EntryPoint, Severity, SyntaxNode, debug_tree};

/// Machine-readable parse result
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub entry: EntryPoint,
    pub root: String,
    pub tree: String,
    pub diagnostics: Vec<DiagnosticReport>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub severity: Severity,
    pub message: String,
    pub start: u32,
    pub end: u32,
}

impl ParseReport {
    pub fn new(entry: EntryPoint, tree: &SyntaxNode, diagnostics: &[Diagnostic]) -> Self {
        Self {
            entry,
            root: tree.kind().to_string(),
            tree: debug_tree(tree),
            diagnostics: diagnostics
                .iter()
                .map(|diagnostic| DiagnosticReport {
                    severity: diagnostic.severity,
                    message: diagnostic.message.clone(),
                    start: diagnostic.range.start().into(),
                    end: diagnostic.range.end().into(),
                })
                .collect(),
        }
    }
}

/// One-line count of errors and warnings
pub fn summary(diagnostics: &[Diagnostic]) -> String {
    let count = |severity: Severity| diagnostics.iter().filter(|d| d.severity == severity).count();
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    };
    format!(
        "{}, {}",
        plural(count(Severity::Error), "error"),
        plural(count(Severity::Warning), "warning")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::parse;

    #[test]
    fn test_summary() {
        let result = parse("a b;\n", EntryPoint::SourceFile);
        assert_eq!(summary(&result.diagnostics), "1 error, 1 warning");
        assert_eq!(summary(&[]), "0 errors, 0 warnings");
    }

    #[test]
    fn test_report_fields() {
        let result = parse("if x {", EntryPoint::Stmt);
        let report = ParseReport::new(EntryPoint::Stmt, &result.syntax_node(), &result.diagnostics);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entry"], "stmt");
        assert_eq!(json["root"], "IfStmt");
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["start"], 6);
    }
}

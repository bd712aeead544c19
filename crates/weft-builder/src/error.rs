//! Error types for template building and configuration loading

use crate::diagnostics::FormattedDiagnostics;
use rowan::GreenNode;
use std::path::PathBuf;
use thiserror::Error;
use weft_syntax::{Diagnostic, SyntaxKind};

/// Why a finished template could not become the requested tree
///
/// Both variants keep the parsed tree so callers can inspect what the parser
/// made of the template. Trees are held as green nodes, which keeps the error
/// `Send + Sync`.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The parser reported at least one error
    #[error("\n{rendered}")]
    ParseDiagnostics {
        diagnostics: Vec<Diagnostic>,
        tree: GreenNode,
        rendered: FormattedDiagnostics,
    },

    /// The template parsed cleanly but into a different kind of node
    #[error("parsing the template was expected to produce a {expected} but produced a {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: SyntaxKind,
        tree: GreenNode,
    },
}

impl TemplateError {
    /// The tree the parser produced for the template
    pub fn tree(&self) -> &GreenNode {
        match self {
            TemplateError::ParseDiagnostics { tree, .. } | TemplateError::TypeMismatch { tree, .. } => {
                tree
            }
        }
    }

    /// Parser diagnostics, empty for a type mismatch
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            TemplateError::ParseDiagnostics { diagnostics, .. } => diagnostics,
            TemplateError::TypeMismatch { .. } => &[],
        }
    }
}

/// Configuration discovery and loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported config format '{path}' (expected .json or .toml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },
}

/// Result of building a template
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;
    use weft_syntax::{EntryPoint, parse};

    #[test]
    fn test_type_mismatch_message() {
        let tree = parse("x", EntryPoint::Expr).green;
        let error = TemplateError::TypeMismatch {
            expected: "IfStmt",
            actual: SyntaxKind::DeclReferenceExpr,
            tree,
        };
        assert_eq!(
            error.to_string(),
            "parsing the template was expected to produce a IfStmt but produced a DeclReferenceExpr"
        );
        assert!(error.diagnostics().is_empty());
    }

    #[test]
    fn test_errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<TemplateError>();
        assert_send_sync::<ConfigError>();
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(error.to_string(), "Config file not found: missing.json");
    }
}

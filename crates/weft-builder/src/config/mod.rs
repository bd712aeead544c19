//! Builder configuration
//!
//! Settings for the parser the reconciler drives, for rendering parser
//! diagnostics and for indentation propagation. Read from `.weftrc.json`
//! (JSON with comments and trailing commas) or `.weftrc.toml`, discovered by
//! walking up from the working directory.
//!
//! ```jsonc
//! {
//!   "parser": { "maxNestingDepth": 128 },
//!   "diagnostics": {
//!     "contextLines": 3,
//!     "color": "never"
//!   },
//!   "indentation": { "propagate": true }
//! }
//! ```
//!
//! Every field is optional; missing ones take their defaults.

mod loader;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};

use crate::diagnostics::ColorChoice;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use weft_syntax::ParserConfig;

/// Top-level configuration for building templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    #[schemars(description = "Parser limits")]
    pub parser: ParserConfig,

    #[schemars(description = "How parser diagnostics are rendered")]
    pub diagnostics: DiagnosticsConfig,

    #[schemars(description = "How spliced fragments are re-indented")]
    pub indentation: IndentationConfig,
}

impl BuilderConfig {
    /// JSON Schema describing the configuration file
    pub fn json_schema() -> String {
        let schema = schemars::schema_for!(BuilderConfig);
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }
}

/// Diagnostics rendering configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Source lines shown above the offending line
    #[schemars(description = "Number of source lines shown before the line a diagnostic points at")]
    pub context_lines: usize,

    /// Unset means the embedding program decides
    #[schemars(description = "Colorize rendered diagnostics: 'auto', 'always' or 'never'")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChoice>,
}

impl DiagnosticsConfig {
    /// Color choice in effect, `never` when unset
    pub fn color(&self) -> ColorChoice {
        self.color.unwrap_or_default()
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            context_lines: 2,
            color: None,
        }
    }
}

/// Indentation propagation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct IndentationConfig {
    /// Re-indent multi-line fragments to the column they are spliced at
    #[schemars(description = "Re-indent the line breaks of spliced fragments to match the splice point")]
    pub propagate: bool,
}

impl Default for IndentationConfig {
    fn default() -> Self {
        Self { propagate: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.parser.max_nesting_depth, 256);
        assert_eq!(config.diagnostics.context_lines, 2);
        assert_eq!(config.diagnostics.color, None);
        assert_eq!(config.diagnostics.color(), ColorChoice::Never);
        assert!(config.indentation.propagate);
    }

    #[test]
    fn test_partial_json() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{"diagnostics": {"color": "always"}}"#).unwrap();
        assert_eq!(config.diagnostics.color, Some(ColorChoice::Always));
        assert_eq!(config.diagnostics.context_lines, 2);
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn test_unset_color_not_serialized() {
        let json = serde_json::to_string(&DiagnosticsConfig::default()).unwrap();
        assert_eq!(json, r#"{"contextLines":2}"#);
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = BuilderConfig::json_schema();
        assert!(schema.contains("contextLines"));
        assert!(schema.contains("maxNestingDepth"));
        assert!(schema.contains("propagate"));
    }
}

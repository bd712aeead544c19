//! Weft Builder
//!
//! Build typed weft syntax trees from templates that mix literal source text
//! with trees you already have.
//!
//! A template is assembled in a [`Template`], parsed as a whole with the
//! production of the requested node type, and reconciled: every spliced
//! fragment is put back into the fresh tree, so the result shares it instead
//! of holding a re-parsed copy. Multi-line fragments are re-indented to the
//! indentation in front of them.
//!
//! ```
//! use weft_builder::{FromTemplate, template};
//! use weft_syntax::AstNode;
//! use weft_syntax::ast::{Expr, IfStmt};
//!
//! let condition = Expr::from_source("x == 1");
//! let stmt = IfStmt::from_template(template!("if " {condition} " { }"));
//!
//! assert_eq!(stmt.to_string(), "if x == 1 { }");
//! let spliced = stmt.condition().unwrap();
//! assert!(std::ptr::eq(&*spliced.syntax().green(), &*condition.syntax().green()));
//! ```
//!
//! Templates that may be malformed go through the fallible entry points:
//!
//! ```
//! use weft_builder::{FromTemplate, TemplateError};
//! use weft_syntax::ast::IfStmt;
//!
//! let error = IfStmt::try_from_source("if x == 1 {").unwrap_err();
//! assert!(matches!(error, TemplateError::ParseDiagnostics { .. }));
//! assert!(error.to_string().contains("expected '}' to end code block"));
//! ```

pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod indent;
pub mod interpolation;
pub mod reconcile;
pub mod registry;

pub use config::{BuilderConfig, ConfigLoader, DiagnosticsConfig, IndentationConfig};
pub use console::{Color, Console};
pub use diagnostics::{ColorChoice, DiagnosticsFormatter, FormattedDiagnostics};
pub use error::{ConfigError, Result, TemplateError};
pub use indent::Indenter;
pub use interpolation::{FinishedTemplate, Indentation, SourceBuffer, Template, TextRenderable};
pub use reconcile::{FromTemplate, Reconciler};
pub use registry::{FragmentRecord, FragmentRegistry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing for the weft crates
///
/// Honors `RUST_LOG`; defaults to `weft=info`. Logs go to stderr.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weft=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Assemble a [`Template`] from parts
///
/// - `"text"`: a literal
/// - `{expr}`: a typed syntax fragment (anything implementing `AstNode`)
/// - `[expr]`: a value rendered as text (see [`TextRenderable`])
///
/// ```
/// use weft_builder::{FromTemplate, template};
/// use weft_syntax::Keyword;
/// use weft_syntax::ast::{Expr, ReturnStmt};
///
/// let value = Expr::from_source("total / count");
/// let stmt = ReturnStmt::from_template(template!([Keyword::Return] {value}));
/// assert_eq!(stmt.to_string(), "return total / count");
/// ```
#[macro_export]
macro_rules! template {
    (@append $template:ident;) => {};
    (@append $template:ident; $literal:literal $($rest:tt)*) => {
        $template.append_literal($literal);
        $crate::template!(@append $template; $($rest)*);
    };
    (@append $template:ident; { $fragment:expr } $($rest:tt)*) => {
        $template.append_fragment(&$fragment);
        $crate::template!(@append $template; $($rest)*);
    };
    (@append $template:ident; [ $text:expr ] $($rest:tt)*) => {
        $template.append_text(&$text);
        $crate::template!(@append $template; $($rest)*);
    };
    ($($part:tt)*) => {{
        let mut template = $crate::Template::new();
        $crate::template!(@append template; $($part)*);
        template
    }};
}

//! Command implementations

use crate::output::{self, ParseReport};
use crate::{BuildTarget, OutputFormat};
use anyhow::{Context, bail};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use weft_builder::{
    BuilderConfig, ColorChoice, ConfigLoader, DiagnosticsFormatter, FromTemplate, Reconciler,
    Template, TemplateError,
};
use weft_syntax::ast::{
    CodeBlock, Decl, Expr, FunctionDecl, IfStmt, Item, Pattern, SourceFile, Stmt, Type,
    VariableDecl,
};
use weft_syntax::{AstNode, Parser, SyntaxNode, SyntaxParse, WeftParser, debug_tree};

/// Load the configuration and apply command-line overrides
pub fn load_config(path: Option<&Path>, no_color: bool) -> anyhow::Result<BuilderConfig> {
    let mut config = ConfigLoader::load(path, None)?;
    if no_color {
        config.diagnostics.color = Some(ColorChoice::Never);
    } else {
        config.diagnostics.color.get_or_insert(ColorChoice::Auto);
    }
    Ok(config)
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

pub fn parse_command(
    path: &Path,
    entry: weft_syntax::EntryPoint,
    format: OutputFormat,
    config: &BuilderConfig,
) -> anyhow::Result<ExitCode> {
    let source = read_source(path)?;
    let result = WeftParser::new(config.parser).parse(&source, entry);
    let tree = result.syntax_node();
    debug!(%entry, diagnostics = result.diagnostics.len(), "parsed {}", path.display());

    match format {
        OutputFormat::Human => {
            print!("{}", debug_tree(&tree));
            if !result.diagnostics.is_empty() {
                let formatter = DiagnosticsFormatter::new(&config.diagnostics)
                    .with_origin(path.display().to_string());
                eprintln!("{}", formatter.annotated_source(&tree, &result.diagnostics));
                eprintln!();
                eprintln!("{}", output::summary(&result.diagnostics));
            }
        }
        OutputFormat::Json => {
            let report = ParseReport::new(entry, &tree, &result.diagnostics);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub fn build_command(
    template_path: &Path,
    target: BuildTarget,
    fragment_args: &[(String, PathBuf)],
    print_tree: bool,
    config: &BuilderConfig,
) -> anyhow::Result<ExitCode> {
    let reconciler = Reconciler::new(config)
        .with_formatter(DiagnosticsFormatter::new(&config.diagnostics).with_origin(
            template_path.display().to_string(),
        ));

    let mut fragments = HashMap::new();
    for (name, path) in fragment_args {
        let source = read_source(path)?;
        let item = match Item::try_from_source(without_final_line_break(&source)) {
            Ok(item) => item,
            Err(error) => {
                eprintln!("error: fragment '{name}' ({}) is not a single item:{error}", path.display());
                return Ok(ExitCode::FAILURE);
            }
        };
        fragments.insert(name.as_str(), item);
    }

    let text = read_source(template_path)?;
    let template = expand_template(&text, &fragments, config)?;
    let fragment_count = template.fragments().len();

    let built = match target {
        BuildTarget::SourceFile => build::<SourceFile>(&reconciler, template),
        BuildTarget::Item => build::<Item>(&reconciler, template),
        BuildTarget::Stmt => build::<Stmt>(&reconciler, template),
        BuildTarget::Decl => build::<Decl>(&reconciler, template),
        BuildTarget::Expr => build::<Expr>(&reconciler, template),
        BuildTarget::CodeBlock => build::<CodeBlock>(&reconciler, template),
        BuildTarget::Type => build::<Type>(&reconciler, template),
        BuildTarget::Pattern => build::<Pattern>(&reconciler, template),
        BuildTarget::IfStmt => build::<IfStmt>(&reconciler, template),
        BuildTarget::VariableDecl => build::<VariableDecl>(&reconciler, template),
        BuildTarget::FunctionDecl => build::<FunctionDecl>(&reconciler, template),
    };

    match built {
        Ok(node) => {
            info!(kind = %node.kind(), fragments = fragment_count, "built template");
            if print_tree {
                print!("{}", debug_tree(&node));
            } else {
                let text = node.to_string();
                print!("{text}");
                if !text.ends_with('\n') {
                    println!();
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error @ TemplateError::ParseDiagnostics { .. }) => {
            eprintln!("{}", error.to_string().trim_start());
            Ok(ExitCode::FAILURE)
        }
        Err(error) => {
            eprintln!("error: {error}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build<T: SyntaxParse>(
    reconciler: &Reconciler,
    template: Template,
) -> weft_builder::Result<SyntaxNode> {
    reconciler
        .reconcile::<T>(template.finish())
        .map(|node| node.syntax().clone())
}

/// The line break that ends a file is not part of the fragment it holds
fn without_final_line_break(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .or_else(|| text.strip_suffix('\r'))
        .unwrap_or(text)
}

/// Split template text at `${name}` placeholders
fn expand_template(
    text: &str,
    fragments: &HashMap<&str, Item>,
    config: &BuilderConfig,
) -> anyhow::Result<Template> {
    let mut template = Template::with_config(config);
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        let Some(length) = rest[start + 2..].find('}') else {
            bail!("unterminated placeholder at byte {}", text.len() - rest.len() + start);
        };
        let name = &rest[start + 2..start + 2 + length];
        let Some(fragment) = fragments.get(name) else {
            bail!("unknown fragment '{name}'");
        };

        template.append_literal(&rest[..start]).append_fragment(fragment);
        rest = &rest[start + 2 + length + 1..];
    }
    template.append_literal(rest);

    Ok(template)
}

pub fn config_show_command(config: &BuilderConfig) -> anyhow::Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

pub fn config_schema_command() -> anyhow::Result<ExitCode> {
    println!("{}", BuilderConfig::json_schema());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_template() {
        let body = Item::from_source("go()");
        let fragments = HashMap::from([("body", body)]);
        let template =
            expand_template("if ready {\n  ${body}\n}", &fragments, &BuilderConfig::default())
                .unwrap();
        assert_eq!(template.source(), "if ready {\n  go()\n}");
        assert_eq!(template.fragments().len(), 1);
    }

    #[test]
    fn test_without_final_line_break() {
        assert_eq!(without_final_line_break("go()\n"), "go()");
        assert_eq!(without_final_line_break("go()\r\n"), "go()");
        assert_eq!(without_final_line_break("go() // later\n\n"), "go() // later\n");
        assert_eq!(without_final_line_break("go()"), "go()");
    }

    #[test]
    fn test_color_override() {
        let config = load_config(None, true).unwrap();
        assert_eq!(config.diagnostics.color, Some(ColorChoice::Never));
    }

    #[test]
    fn test_expand_template_errors() {
        let fragments = HashMap::new();
        let config = BuilderConfig::default();
        let error = expand_template("a ${missing} b", &fragments, &config).unwrap_err();
        assert_eq!(error.to_string(), "unknown fragment 'missing'");
        let error = expand_template("a ${open", &fragments, &config).unwrap_err();
        assert_eq!(error.to_string(), "unterminated placeholder at byte 2");
    }
}

//! Weft CLI
//!
//! Parse weft sources against a production and build templates into typed
//! trees from the command line.

mod commands;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use weft_builder::init_tracing;
use weft_syntax::EntryPoint;

#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Parse weft sources and build syntax trees from templates")]
#[command(version = weft_builder::VERSION)]
#[command(
    long_about = "weft parses sources of the weft statement language into lossless syntax trees\n\
and builds typed trees from templates that splice in existing fragments.\n\
\n\
Examples:\n  \
weft parse main.weft                         # Print the tree and diagnostics\n  \
weft parse --entry expr snippet.weft         # Parse with another production\n  \
weft build f.tmpl --as function-decl \\\n      \
--fragment body=body.weft                # Splice body.weft into ${body}\n  \
weft config schema                           # JSON Schema of .weftrc.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (.weftrc.json/.weftrc.toml)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print its syntax tree and diagnostics
    Parse {
        /// File to parse
        path: PathBuf,

        /// Production to start from
        #[arg(
            short,
            long,
            default_value = "source-file",
            help = "Production: source-file, item, stmt, decl, expr, code-block, type or pattern"
        )]
        entry: EntryPoint,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Build a template file into a typed tree
    Build {
        /// Template file; `${name}` marks where a fragment goes
        template: PathBuf,

        /// Node type the template must produce
        #[arg(long = "as", default_value = "source-file", help = "Node type to build")]
        target: BuildTarget,

        /// Fragment files, parsed as items and spliced at `${name}`
        #[arg(
            long = "fragment",
            value_name = "NAME=PATH",
            value_parser = parse_fragment_arg,
            help = "Fragment to splice at ${NAME} (can be used multiple times)"
        )]
        fragments: Vec<(String, PathBuf)>,

        /// Print the tree structure instead of the source text
        #[arg(long, help = "Print the built tree instead of its text")]
        tree: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    #[command(alias = "ver")]
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the configuration in effect
    Show,

    /// Print the JSON Schema of the configuration file
    Schema,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Tree on stdout, annotated diagnostics on stderr
    Human,
    /// One JSON document on stdout
    Json,
}

/// Node types `weft build` can produce
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BuildTarget {
    SourceFile,
    Item,
    Stmt,
    Decl,
    Expr,
    CodeBlock,
    Type,
    Pattern,
    IfStmt,
    VariableDecl,
    FunctionDecl,
}

/// Parse a fragment argument in the format name=path
fn parse_fragment_arg(s: &str) -> std::result::Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!(
            "Invalid fragment '{s}'. Expected 'name=path'"
        )),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    if std::env::var_os("RUST_LOG").is_none() {
        let log_level = match cli.verbose {
            0 => "weft=error",
            1 => "weft=warn",
            2 => "weft=info",
            3 => "weft=debug",
            _ => "weft=trace",
        };
        // SAFETY: no other threads exist yet
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("weft failed: {e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = commands::load_config(cli.config.as_deref(), cli.no_color)?;

    match cli.command {
        Some(Commands::Parse {
            path,
            entry,
            format,
        }) => commands::parse_command(&path, entry, format, &config),

        Some(Commands::Build {
            template,
            target,
            fragments,
            tree,
        }) => commands::build_command(&template, target, &fragments, tree, &config),

        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config_show_command(&config),
            ConfigAction::Schema => commands::config_schema_command(),
        },

        Some(Commands::Version) => {
            println!("{} {}", weft_builder::NAME, weft_builder::VERSION);
            Ok(ExitCode::SUCCESS)
        }

        None => {
            // No subcommand provided, show help
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

//! Swagger Markdown CLI
//!
//! Command-line interface for rendering and checking API documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use swagger_markdown::{
    generate_string, lint_file, load_options, write_report, Language, ReportOptions, Severity,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swagger-markdown")]
#[command(about = "Render Swagger/OpenAPI documents as Markdown reports")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document as a Markdown report
    Generate {
        /// Document file (JSON or YAML)
        source: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Endpoint priority, e.g. /api/user/register=1 (repeatable)
        #[arg(long, value_name = "PATH=PRIORITY")]
        order: Vec<String>,

        /// Field or parameter name to leave out of every table (repeatable)
        #[arg(long, value_name = "NAME")]
        ignore: Vec<String>,

        /// Options file (JSON or YAML) with order, ignore and language
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report language: en or zh
        #[arg(long)]
        lang: Option<String>,
    },

    /// Report unresolvable references and composite inclusion cycles
    Check {
        /// Document file (JSON or YAML)
        source: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            source,
            output,
            order,
            ignore,
            config,
            lang,
        } => run_generate(GenerateArgs {
            source,
            output,
            order,
            ignore,
            config,
            lang,
        }),

        Commands::Check {
            source,
            format,
            strict,
        } => run_check(&source, &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct GenerateArgs {
    source: PathBuf,
    output: Option<PathBuf>,
    order: Vec<String>,
    ignore: Vec<String>,
    config: Option<PathBuf>,
    lang: Option<String>,
}

fn run_generate(args: GenerateArgs) -> Result<(), u8> {
    let options = build_options(&args)?;

    let report = generate_string(&args.source, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    match &args.output {
        Some(path) => {
            write_report(path, &report).map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?;
            tracing::info!(path = %path.display(), "markdown report written");
        }
        None => {
            print!("{}", report);
        }
    }

    Ok(())
}

/// Options file first, then command-line flags on top.
fn build_options(args: &GenerateArgs) -> Result<ReportOptions, u8> {
    let mut options = match &args.config {
        Some(path) => load_options(path).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?,
        None => ReportOptions::new(),
    };

    for entry in &args.order {
        let (path, priority) = parse_order(entry).ok_or_else(|| {
            eprintln!(
                "Error: invalid --order value \"{}\": expected PATH=PRIORITY",
                entry
            );
            2u8
        })?;
        options = options.order(path, priority);
    }
    for name in &args.ignore {
        options = options.ignore(name.as_str());
    }
    if let Some(lang) = &args.lang {
        let language = Language::parse(lang).ok_or_else(|| {
            eprintln!("Error: unknown language \"{}\": expected en or zh", lang);
            2u8
        })?;
        options = options.language(language);
    }

    Ok(options)
}

/// Split `PATH=PRIORITY` at the last `=`.
fn parse_order(entry: &str) -> Option<(&str, i64)> {
    let (path, priority) = entry.rsplit_once('=')?;
    if path.is_empty() {
        return None;
    }
    Some((path, priority.trim().parse().ok()?))
}

fn run_check(source: &Path, format: &str, strict: bool) -> Result<(), u8> {
    if !source.exists() {
        eprintln!("Error: path not found: {}", source.display());
        return Err(2);
    }

    let result = lint_file(source);

    if format == "json" {
        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json);
    } else {
        println!("Checking {} ...\n", source.display());

        for diag in &result.diagnostics {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            println!(
                "  {}{}[{}]\x1b[0m: {} - {}",
                color, label, diag.code, diag.path, diag.message
            );
        }

        println!();
        if result.is_ok(strict) {
            println!(
                "\x1b[32m✓ passed ({} errors, {} warnings)\x1b[0m",
                result.errors, result.warnings
            );
        } else {
            println!(
                "\x1b[31m✗ failed ({} errors, {} warnings)\x1b[0m",
                result.errors, result.warnings
            );
        }
    }

    if result.is_ok(strict) {
        Ok(())
    } else {
        Err(1)
    }
}

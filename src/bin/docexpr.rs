//! Command line front end for docexpr
//!
//! Evaluates, parses and validates expressions, and lists the registered
//! functions of the configured context.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand};
use docexpr::parser::helpers::caret_snippet;
use docexpr::{
    EngineConfig, ExpressionEngine, ExpressionError, ParseError, Value, Variables,
    referenced_variables,
};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "docexpr")]
#[command(about = "Evaluate document template expressions")]
#[command(version)]
struct Cli {
    /// JSON engine configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print its value
    Evaluate {
        /// Expression to evaluate
        expression: String,
        #[command(flatten)]
        bindings: Bindings,
        /// Print the value as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the canonical form of an expression and the variables it reads
    Parse {
        /// Expression to parse
        expression: String,
    },
    /// Check that an expression parses
    Validate {
        /// Expression to validate
        expression: String,
    },
    /// List the registered functions
    Functions,
}

#[derive(Args)]
#[group(multiple = false)]
struct Bindings {
    /// Variables as a JSON object
    #[arg(long)]
    vars: Option<String>,
    /// File holding variables as a JSON object
    #[arg(long)]
    vars_file: Option<PathBuf>,
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(2);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Run a command; `Ok(false)` reports an invalid expression
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;
    let engine = ExpressionEngine::with_config(config);

    match cli.command {
        Commands::Evaluate {
            expression,
            bindings,
            json,
        } => {
            let variables = load_variables(&bindings)?;
            match engine.evaluate(&expression, &variables) {
                Ok(value) => {
                    print_value(&value, json)?;
                    Ok(true)
                }
                Err(ExpressionError::Parse(err)) => {
                    report_parse_error(&expression, &err);
                    Ok(false)
                }
                Err(err) => {
                    report(&err.to_string());
                    Ok(false)
                }
            }
        }
        Commands::Parse { expression } => match engine.compile(&expression) {
            Ok(parsed) => {
                println!("{parsed}");
                let variables = referenced_variables(&parsed);
                if !variables.is_empty() {
                    println!("variables: {}", variables.join(", "));
                }
                Ok(true)
            }
            Err(err) => {
                report_parse_error(&expression, &err);
                Ok(false)
            }
        },
        Commands::Validate { expression } => match engine.compile(&expression) {
            Ok(_) => {
                println!("valid");
                Ok(true)
            }
            Err(err) => {
                report_parse_error(&expression, &err);
                Ok(false)
            }
        },
        Commands::Functions => {
            for descriptor in engine.context().functions().descriptors() {
                let mut line = format!("{} ({} arguments)", descriptor.name(), descriptor.arity());
                if !descriptor.aliases().is_empty() {
                    line.push_str(&format!(" aka {}", descriptor.aliases().join(", ")));
                }
                println!("{line}");
                if !descriptor.documentation().is_empty() {
                    println!("    {}", descriptor.documentation());
                }
            }
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("reading config '{}'", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_variables(bindings: &Bindings) -> Result<Variables> {
    let text = match (&bindings.vars, &bindings.vars_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading variables '{}'", path.display()))?,
        (None, None) => return Ok(Variables::default()),
    };
    let json: JsonValue = serde_json::from_str(&text).context("parsing variables")?;
    let JsonValue::Object(entries) = json else {
        bail!("variables must be a JSON object");
    };
    Ok(entries
        .into_iter()
        .map(|(name, value)| (name, Value::from(value)))
        .collect())
}

fn print_value(value: &Value, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn report_parse_error(expression: &str, err: &ParseError) {
    report(&err.to_string());
    if !matches!(err, ParseError::EmptyExpression) {
        eprintln!("{}", caret_snippet(expression, err.position()));
    }
}

fn report(message: &str) {
    #[cfg(feature = "terminal")]
    {
        use colored::Colorize;
        eprintln!("{}: {}", "error".red().bold(), message);
    }

    #[cfg(not(feature = "terminal"))]
    eprintln!("error: {message}");
}

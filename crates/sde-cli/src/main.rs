//! # sde CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sde_cli::check_schema::{run_check_schema, CheckSchemaArgs};
use sde_cli::get::{run_get, GetArgs};
use sde_cli::validate::{run_validate, ValidateArgs};
use sde_cli::EXIT_USAGE;

/// Structured Data Engine CLI
///
/// Validates and coerces JSON or YAML documents against declarative schema
/// files, and reads values out of them by dot-path.
#[derive(Parser, Debug)]
#[command(name = "sde", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a document against a schema and print the coerced result.
    Validate(ValidateArgs),

    /// Validate a document, then print the value at a dot-path.
    Get(GetArgs),

    /// Load and compile a schema definition.
    CheckSchema(CheckSchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("sde CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Get(args) => run_get(&args),
        Commands::CheckSchema(args) => run_check_schema(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

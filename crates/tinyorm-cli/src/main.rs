//! # tinyorm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tinyorm_cli::convert::{run_convert, ConvertArgs};
use tinyorm_cli::serialize::{run_serialize, SerializeArgs};
use tinyorm_cli::validate::{run_validate, ValidateArgs};

/// tinyorm: model validation and key-case conversion for JSON documents.
#[derive(Parser, Debug)]
#[command(name = "tinyorm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every key of a JSON document to camelCase or snake_case.
    Convert(ConvertArgs),

    /// Build a model from a JSON document and validate it.
    Validate(ValidateArgs),

    /// Build a model from a JSON document and print its plain-object form.
    Serialize(SerializeArgs),
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

    let result = match cli.command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Serialize(args) => run_serialize(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

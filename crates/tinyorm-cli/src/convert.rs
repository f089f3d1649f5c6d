//! # Convert Subcommand
//!
//! Deep key-case conversion of a JSON document.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tinyorm_core::{change_case_deep, KeyCase};

use crate::read_json_input;

/// Target casing on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseArg {
    Camel,
    Snake,
}

impl From<CaseArg> for KeyCase {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Camel => KeyCase::Camel,
            CaseArg::Snake => KeyCase::Snake,
        }
    }
}

/// Arguments for the `tinyorm convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Casing to convert every object key to.
    #[arg(long, value_enum)]
    pub case: CaseArg,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,

    /// JSON document to read; stdin when omitted.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the convert subcommand, returning the exit code.
pub fn run_convert(args: &ConvertArgs) -> Result<u8> {
    let document = read_json_input(args.path.as_deref())?;
    println!("{}", render_converted(&document, args.case.into(), args.compact)?);
    Ok(0)
}

fn render_converted(document: &serde_json::Value, case: KeyCase, compact: bool) -> Result<String> {
    let converted = change_case_deep(document, |key| case.apply(key));
    tracing::debug!(%case, "converted document keys");
    Ok(if compact {
        serde_json::to_string(&converted)?
    } else {
        serde_json::to_string_pretty(&converted)?
    })
}

//! # Serialize Subcommand
//!
//! Builds a model from a JSON document and prints its plain-object form,
//! camelCase by default or snake_case for row/column stores.

use anyhow::{Context, Result};
use clap::Args;
use tinyorm_core::KeyCase;
use tinyorm_model::Model;

use crate::{build_model, ModelArgs};

/// Arguments for the `tinyorm serialize` subcommand.
#[derive(Args, Debug)]
pub struct SerializeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Emit snake_case keys.
    #[arg(long)]
    pub snake: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the serialize subcommand.
///
/// Returns exit code: 0 on success, 1 when the model could not be built.
pub fn run_serialize(args: &SerializeArgs) -> Result<u8> {
    match build_model(&args.model)? {
        Ok(model) => {
            println!("{}", render(&model, args)?);
            Ok(0)
        }
        Err(e) => {
            println!("{}: FAIL {e}", args.model.model);
            Ok(1)
        }
    }
}

fn render(model: &Model, args: &SerializeArgs) -> Result<String> {
    let case = if args.snake { KeyCase::Snake } else { KeyCase::Camel };
    if args.pretty {
        serde_json::to_string_pretty(&model.to_object_with_case(case))
            .context("failed to render model")
    } else {
        model.to_json_string(case).context("failed to render model")
    }
}

//! # Validate Subcommand
//!
//! Builds a model from a JSON document and runs every field schema.
//! Strict model types already reject bad values while the model is built;
//! both kinds of failure are reported the same way.

use anyhow::Result;
use clap::Args;
use tinyorm_model::ModelError;

use crate::{build_model, ModelArgs};

/// Arguments for the `tinyorm validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document is valid, 1 when it is not.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let outcome = build_model(&args.model)?.and_then(|model| model.validate());
    report(&args.model.model, outcome)
}

fn report(model_name: &str, outcome: std::result::Result<(), ModelError>) -> Result<u8> {
    match outcome {
        Ok(()) => {
            println!("{model_name}: OK");
            Ok(0)
        }
        Err(ModelError::Validation(e)) => {
            println!("{model_name}: FAIL {e}");
            for violation in e.violations().iter().skip(1) {
                println!("  {violation}");
            }
            Ok(1)
        }
        Err(e) => {
            println!("{model_name}: FAIL {e}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use serde_json::json;

    fn args(dir: &std::path::Path, model: &str, source: bool, doc: serde_json::Value) -> ValidateArgs {
        ValidateArgs {
            model: ModelArgs {
                catalog: write_catalog(dir),
                model: model.into(),
                source,
                path: Some(write_json(dir, "doc.json", &doc)),
            },
        }
    }

    #[test]
    fn valid_document_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path(), "Author", true, json!({"id": 2, "author_id": GUID}));
        assert_eq!(run_validate(&a).unwrap(), 0);
    }

    #[test]
    fn strict_rejection_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path(), "Author", false, json!({"id": 6}));
        assert_eq!(run_validate(&a).unwrap(), 1);
    }

    #[test]
    fn lenient_violation_found_by_validate() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path(), "Post", false, json!({"rating": 9}));
        assert_eq!(run_validate(&a).unwrap(), 1);
    }

    #[test]
    fn non_object_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(dir.path(), "Post", false, json!([1]));
        assert_eq!(run_validate(&a).unwrap(), 1);
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path(), "Post", false, json!({}));
        a.model.catalog = dir.path().join("nope.yaml");
        assert!(run_validate(&a).is_err());
    }
}

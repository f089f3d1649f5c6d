//! # tinyorm-cli — Command-Line Interface
//!
//! ## Subcommands
//!
//! - `convert`: deep camelCase/snake_case key conversion of a JSON document
//! - `validate`: build a model from a document and run its schemas
//! - `serialize`: build a model and print the walker output
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from behavior; handlers return an exit
//!   code and delegate to the library crates.
//! - Documents are read from a path, or stdin when no path is given.

pub mod convert;
pub mod serialize;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tinyorm_model::{Model, ModelCatalog, ModelError};

/// Options shared by the subcommands that build a model.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// YAML model catalog.
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Model type to build.
    #[arg(long, value_name = "NAME")]
    pub model: String,

    /// Treat the document as an external source: normalise keys to
    /// camelCase before assigning them.
    #[arg(long)]
    pub source: bool,

    /// JSON document to read; stdin when omitted.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Read a JSON document from `path`, or from stdin when `path` is `None`.
pub fn read_json_input(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("input is not valid JSON")
}

/// Load the catalog and build the requested model from the document.
///
/// The outer `Result` carries operational failures (unreadable files,
/// unknown model); the inner one carries model errors such as a strict
/// assignment being rejected, which callers report as invalid input.
pub fn build_model(args: &ModelArgs) -> Result<std::result::Result<Model, ModelError>> {
    let catalog = ModelCatalog::load(&args.catalog)
        .with_context(|| format!("failed to load catalog {}", args.catalog.display()))?;
    let model_type = catalog.require(&args.model)?.clone();
    let document = read_json_input(args.path.as_deref())?;

    tracing::debug!(model = %args.model, source = args.source, "building model");

    Ok(if args.source {
        Model::from_source(model_type, &document)
    } else {
        Model::from_object(model_type, &document)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const GUID: &str = "3ed44ac2-4dd8-4a2a-9aaa-879e4a44148f";

    /// Write a catalog with a strict `Author` and a lenient `Post`.
    pub fn write_catalog(root: &Path) -> PathBuf {
        let path = root.join("models.yaml");
        fs::write(
            &path,
            r#"
models:
  - name: Author
    strict: true
    fields:
      - name: id
        schema: { type: integer, minimum: 1, maximum: 5 }
      - name: authorId
        schema: { type: string, format: uuid }
  - name: Post
    fields:
      - name: rating
        schema: { type: integer, minimum: 1, maximum: 5 }
      - name: author
        model: Author
"#,
        )
        .unwrap();
        path
    }

    pub fn write_json(root: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = root.join(name);
        fs::write(&path, value.to_string()).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "doc.json", &json!({"a": 1}));
        assert_eq!(read_json_input(Some(&path)).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{nope").unwrap();
        let err = read_json_input(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("not valid JSON"));
    }

    #[test]
    fn builds_model_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let args = ModelArgs {
            catalog: write_catalog(dir.path()),
            model: "Author".into(),
            source: true,
            path: Some(write_json(dir.path(), "a.json", &json!({"id": 1, "author_id": GUID}))),
        };
        let model = build_model(&args).unwrap().unwrap();
        assert_eq!(model.get_json("authorId"), Some(json!(GUID)));
    }

    #[test]
    fn unknown_model_is_operational_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ModelArgs {
            catalog: write_catalog(dir.path()),
            model: "Ghost".into(),
            source: false,
            path: Some(write_json(dir.path(), "a.json", &json!({}))),
        };
        assert!(build_model(&args).is_err());
    }
}

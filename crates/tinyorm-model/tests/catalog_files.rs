//! Integration test: load a YAML catalog from disk with a sibling schema
//! directory, then build and serialize models from it.

use std::fs;
use std::path::Path;

use serde_json::json;
use tinyorm_model::{DefinitionError, Model, ModelCatalog};

const GUID: &str = "3ed44ac2-4dd8-4a2a-9aaa-879e4a44148f";

const CATALOG: &str = r#"
schemas_dir: schemas
models:
  - name: Author
    strict: true
    fields:
      - name: id
        schema: { type: integer, minimum: 1 }
      - name: authorGuid
        schema: { "$ref": "guid.schema.json" }
  - name: Post
    fields:
      - name: title
        schema: { type: string, minLength: 1 }
      - name: author
        model: Author
"#;

fn write_catalog(root: &Path) -> std::path::PathBuf {
    let schemas = root.join("schemas");
    fs::create_dir_all(&schemas).unwrap();
    fs::write(
        schemas.join("guid.schema.json"),
        r#"{"type": "string", "format": "uuid"}"#,
    )
    .unwrap();

    let path = root.join("models.yaml");
    fs::write(&path, CATALOG).unwrap();
    path
}

#[test]
fn loads_catalog_with_relative_schema_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_catalog(dir.path());

    let catalog = ModelCatalog::load(&path).expect("catalog loads");
    assert_eq!(catalog.names(), vec!["Author", "Post"]);

    let author = catalog.require("Author").unwrap();
    let schema = author.field("authorGuid").and_then(|f| f.schema()).unwrap();
    assert!(schema.is_valid(&json!(GUID)));
    assert!(!schema.is_valid(&json!("nope")));
}

#[test]
fn catalog_models_round_trip_rows() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = ModelCatalog::load(write_catalog(dir.path())).unwrap();
    let post_type = catalog.require("Post").unwrap().clone();

    let row = json!({
        "title": "Hello",
        "author": {"id": 1, "author_guid": GUID}
    });
    let post = Model::from_source(post_type, &row).unwrap();
    assert!(post.validate().is_ok());
    assert_eq!(post.to_db_object(), row);
    assert_eq!(post.to_object()["author"]["authorGuid"], json!(GUID));
}

#[test]
fn strict_nested_type_from_catalog_rejects_bad_guid() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = ModelCatalog::load(write_catalog(dir.path())).unwrap();
    let post_type = catalog.require("Post").unwrap().clone();

    let err = Model::from_source(post_type, &json!({"author": {"author_guid": "x"}})).unwrap_err();
    assert!(err.to_string().starts_with("Author.authorGuid"), "{err}");
}

#[test]
fn missing_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelCatalog::load(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, DefinitionError::Read { .. }));
}

#[test]
fn missing_schema_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("models.yaml");
    fs::write(&path, CATALOG).unwrap();
    let err = ModelCatalog::load(&path).unwrap_err();
    assert!(matches!(err, DefinitionError::Registry(_)));
}

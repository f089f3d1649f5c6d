//! # Schema Registry
//!
//! Shared schema documents that field schemas can `$ref`.
//!
//! ## Schema Resolution
//!
//! Each document is registered under its file name (`guid.schema.json`)
//! and, when present, under its `$id`. A field schema such as
//! `{"$ref": "guid.schema.json"}` resolves against the default base URI,
//! and the retriever falls back to matching the last path segment, so both
//! bare file names and absolute `$id` URIs work. Internal `$ref`s
//! (`#/$defs/...`) are handled by the jsonschema crate natively.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::schema::{LocalSchemaRetriever, Schema, SchemaError};

/// A set of named schema documents available for `$ref` resolution.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Directory the documents were loaded from, if any.
    schema_dir: Option<PathBuf>,
    /// Map from schema name (e.g., "guid.schema.json") to parsed JSON value.
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.schema.json` file in `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if the directory cannot be read or a
    /// file is not valid JSON.
    pub fn load_dir(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let mut schemas = HashMap::new();

        let entries = std::fs::read_dir(&schema_dir).map_err(|e| SchemaError::Load {
            schema_name: schema_dir.display().to_string(),
            reason: format!("cannot read schema directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.ends_with(".schema.json") {
                    let content = std::fs::read_to_string(&path)?;
                    let value: Value =
                        serde_json::from_str(&content).map_err(|e| SchemaError::Load {
                            schema_name: name.to_string(),
                            reason: format!("invalid JSON: {e}"),
                        })?;
                    schemas.insert(name.to_string(), value);
                }
            }
        }

        Ok(Self {
            schema_dir: Some(schema_dir),
            schemas,
        })
    }

    /// Register a document under `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, document: Value) {
        self.schemas.insert(name.into(), document);
    }

    /// The directory the registry was loaded from.
    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    /// Returns the number of registered documents.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Returns the names of all registered documents, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Look up a registered document by name.
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Compile a field schema whose `$ref`s may point at registered documents.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Build`] if the document is invalid or a
    /// reference cannot be resolved.
    pub fn compile(&self, source: Value) -> Result<Schema, SchemaError> {
        Schema::compile_with(source, self.retriever())
    }

    /// Compile a registered document by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotFound`] if no document has that name, or
    /// [`SchemaError::Build`] if it does not compile.
    pub fn load(&self, name: &str) -> Result<Schema, SchemaError> {
        let source = self
            .schemas
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound {
                schema_name: name.to_string(),
            })?;
        self.compile(source)
    }

    fn retriever(&self) -> LocalSchemaRetriever {
        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();

        for (name, value) in &self.schemas {
            if let Some(id_str) = value.get("$id").and_then(|v| v.as_str()) {
                schemas_by_uri.insert(id_str.to_string(), value.clone());
            }
            schemas_by_uri.insert(name.clone(), value.clone());
        }

        LocalSchemaRetriever { schemas_by_uri }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guid_schema() -> Value {
        json!({"type": "string", "format": "uuid"})
    }

    #[test]
    fn in_memory_ref_resolution() {
        let mut registry = SchemaRegistry::new();
        registry.insert("guid.schema.json", guid_schema());

        let schema = registry.compile(json!({"$ref": "guid.schema.json"})).unwrap();
        assert!(schema.is_valid(&json!("3ed44ac2-4dd8-4a2a-9aaa-879e4a44148f")));
        assert!(!schema.is_valid(&json!("x")));
    }

    #[test]
    fn ref_by_id() {
        let mut registry = SchemaRegistry::new();
        registry.insert(
            "rating.schema.json",
            json!({
                "$id": "https://tinyorm.local/schemas/rating.schema.json",
                "type": "integer",
                "minimum": 1,
                "maximum": 5
            }),
        );

        let schema = registry
            .compile(json!({"$ref": "https://tinyorm.local/schemas/rating.schema.json"}))
            .unwrap();
        assert!(schema.is_valid(&json!(3)));
        assert!(!schema.is_valid(&json!(9)));
    }

    #[test]
    fn load_by_name() {
        let mut registry = SchemaRegistry::new();
        registry.insert("guid.schema.json", guid_schema());
        assert!(registry.load("guid.schema.json").is_ok());
        assert!(matches!(
            registry.load("nope.schema.json"),
            Err(SchemaError::NotFound { .. })
        ));
    }

    #[test]
    fn unknown_ref_fails_to_compile() {
        let registry = SchemaRegistry::new();
        assert!(registry.compile(json!({"$ref": "guid.schema.json"})).is_err());
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.insert("b.schema.json", json!({}));
        registry.insert("a.schema.json", json!({}));
        assert_eq!(registry.schema_names(), vec!["a.schema.json", "b.schema.json"]);
        assert_eq!(registry.schema_count(), 2);
        assert!(registry.schema_dir().is_none());
    }
}

//! # Compiled Field Schemas

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

/// Error while loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    Load {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// No schema with this name is registered.
    #[error("schema '{schema_name}' not found")]
    NotFound {
        /// The name that was looked up.
        schema_name: String,
    },

    /// The schema document is not a valid JSON Schema.
    #[error("schema build error: {reason}")]
    Build {
        /// Reason reported by the schema compiler.
        reason: String,
    },

    /// IO error reading a schema directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A compiled JSON Schema, cheap to clone and shareable across threads.
#[derive(Clone)]
pub struct Schema {
    source: Arc<Value>,
    validator: Arc<Validator>,
}

impl Schema {
    /// Compile a standalone schema document.
    ///
    /// Any `$ref` to another document fails to resolve; use
    /// [`SchemaRegistry::compile`](crate::SchemaRegistry::compile) for
    /// schemas that reference shared definitions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Build`] if the document is not a valid schema.
    pub fn new(source: Value) -> Result<Self, SchemaError> {
        Self::compile_with(source, LocalSchemaRetriever::default())
    }

    pub(crate) fn compile_with(
        source: Value,
        retriever: LocalSchemaRetriever,
    ) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .should_validate_formats(true)
            .with_retriever(retriever)
            .build(&source)
            .map_err(|e| SchemaError::Build {
                reason: e.to_string(),
            })?;

        Ok(Self {
            source: Arc::new(source),
            validator: Arc::new(validator),
        })
    }

    /// The schema document this was compiled from.
    pub fn source(&self) -> &Value {
        &self.source
    }

    /// Whether `instance` satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Resolves `$ref` URIs to schema documents held in memory.
///
/// Lookup tries the full URI first, then the last path segment (the file
/// name), so `guid.schema.json`, `json-schema:///guid.schema.json` and an
/// absolute `$id` all reach the same document.
#[derive(Debug, Clone, Default)]
pub(crate) struct LocalSchemaRetriever {
    pub(crate) schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("referenced schema '{uri_str}' is not registered").into())
    }
}

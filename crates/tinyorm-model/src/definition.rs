//! # Model Catalogs
//!
//! Declares model types in YAML instead of code:
//!
//! ```yaml
//! schemas_dir: schemas
//! models:
//!   - name: Author
//!     strict: true
//!     fields:
//!       - name: id
//!         schema: { type: integer, minimum: 1 }
//!       - name: authorGuid
//!         schema: { "$ref": "guid.schema.json" }
//!   - name: Post
//!     fields:
//!       - name: author
//!         model: Author
//! ```
//!
//! `schemas_dir` is resolved relative to the catalog file and loaded into a
//! [`SchemaRegistry`], so field schemas can `$ref` shared documents. A
//! `model:` reference must name a model declared earlier in the list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tinyorm_schema::{SchemaError, SchemaRegistry};

use crate::field::FieldDescriptor;
use crate::model_type::ModelType;

/// Errors while loading a model catalog.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The catalog file could not be read.
    #[error("cannot read catalog '{}': {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The catalog is not valid YAML or does not match the catalog shape.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The schema directory could not be loaded.
    #[error("schema registry: {0}")]
    Registry(#[source] SchemaError),

    /// A field schema failed to compile.
    #[error("schema for {model}.{field}: {source}")]
    Schema {
        /// Model the field belongs to.
        model: String,
        /// Field name.
        field: String,
        /// Compilation error.
        source: SchemaError,
    },

    /// A field references a model that is not declared before it.
    #[error("{model}.{field} references unknown model '{target}'")]
    UnknownNested {
        /// Model the field belongs to.
        model: String,
        /// Field name.
        field: String,
        /// The missing model name.
        target: String,
    },

    /// Two models share a name.
    #[error("model '{0}' is declared more than once")]
    DuplicateModel(String),

    /// A model declares the same field twice.
    #[error("field '{field}' is declared more than once on {model}")]
    DuplicateField {
        /// Model name.
        model: String,
        /// Repeated field name.
        field: String,
    },

    /// A model was requested that the catalog does not contain.
    #[error("model '{0}' is not in the catalog")]
    UnknownModel(String),
}

// ─── Catalog Document ────────────────────────────────────────────────

/// The YAML catalog as written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    /// Directory of `*.schema.json` documents, relative to the catalog.
    #[serde(default)]
    pub schemas_dir: Option<PathBuf>,
    /// Model declarations in dependency order.
    pub models: Vec<ModelDefinition>,
}

/// One model declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One field declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    pub name: String,
    /// Inline JSON Schema, possibly a `$ref` into the registry.
    #[serde(default)]
    pub schema: Option<Value>,
    /// Name of a previously declared model for nested values.
    #[serde(default)]
    pub model: Option<String>,
}

// ─── Catalog ─────────────────────────────────────────────────────────

/// Model types built from a catalog document, looked up by name.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    types: BTreeMap<String, Arc<ModelType>>,
}

impl ModelCatalog {
    /// Read and build a catalog file.
    ///
    /// # Errors
    ///
    /// Any [`DefinitionError`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&text, path.parent())?;
        tracing::info!(
            path = %path.display(),
            models = catalog.len(),
            "loaded model catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from YAML text. A relative `schemas_dir` is resolved
    /// against `base_dir` when given.
    ///
    /// # Errors
    ///
    /// Any [`DefinitionError`].
    pub fn from_yaml_str(yaml: &str, base_dir: Option<&Path>) -> Result<Self, DefinitionError> {
        let document: CatalogDocument = serde_yaml::from_str(yaml)?;

        let registry = match &document.schemas_dir {
            Some(dir) => {
                let dir = match base_dir {
                    Some(base) if dir.is_relative() => base.join(dir),
                    _ => dir.clone(),
                };
                SchemaRegistry::load_dir(&dir).map_err(DefinitionError::Registry)?
            }
            None => SchemaRegistry::new(),
        };
        tracing::debug!(schemas = registry.schema_count(), "schema registry ready");

        Self::from_document(&document, &registry)
    }

    /// Build a catalog from a parsed document and a registry.
    ///
    /// # Errors
    ///
    /// Any [`DefinitionError`] other than `Read` and `Parse`.
    pub fn from_document(
        document: &CatalogDocument,
        registry: &SchemaRegistry,
    ) -> Result<Self, DefinitionError> {
        let mut types: BTreeMap<String, Arc<ModelType>> = BTreeMap::new();

        for definition in &document.models {
            if types.contains_key(&definition.name) {
                return Err(DefinitionError::DuplicateModel(definition.name.clone()));
            }

            let mut builder = ModelType::builder(&definition.name).strict(definition.strict);
            let mut seen: Vec<&str> = Vec::new();

            for field in &definition.fields {
                if seen.contains(&field.name.as_str()) {
                    return Err(DefinitionError::DuplicateField {
                        model: definition.name.clone(),
                        field: field.name.clone(),
                    });
                }
                seen.push(&field.name);

                let mut descriptor = FieldDescriptor::new(&field.name);

                if let Some(document) = &field.schema {
                    let schema = registry.compile(document.clone()).map_err(|source| {
                        DefinitionError::Schema {
                            model: definition.name.clone(),
                            field: field.name.clone(),
                            source,
                        }
                    })?;
                    descriptor = descriptor.with_schema(schema);
                }

                if let Some(target) = &field.model {
                    let nested = types.get(target).ok_or_else(|| DefinitionError::UnknownNested {
                        model: definition.name.clone(),
                        field: field.name.clone(),
                        target: target.clone(),
                    })?;
                    descriptor = descriptor.with_nested(Arc::clone(nested));
                }

                builder = builder.field(descriptor);
            }

            tracing::debug!(
                model = %definition.name,
                strict = definition.strict,
                fields = definition.fields.len(),
                "registered model type"
            );
            types.insert(definition.name.clone(), builder.build());
        }

        Ok(Self { types })
    }

    /// Look up a model type.
    pub fn get(&self, name: &str) -> Option<&Arc<ModelType>> {
        self.types.get(name)
    }

    /// Look up a model type, failing if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::UnknownModel`].
    pub fn require(&self, name: &str) -> Result<&Arc<ModelType>, DefinitionError> {
        self.get(name)
            .ok_or_else(|| DefinitionError::UnknownModel(name.to_string()))
    }

    /// Model names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

//! # tinyorm-model — Models, Fields, and Serialization
//!
//! A model is an instance of a [`ModelType`]: a named table of field
//! descriptors, each optionally carrying a compiled schema or a nested
//! model type. Values enter a model through one door,
//! [`Model::set_field`], which records the value (and the field's schema,
//! the first time) and, for strict types, validates before committing.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialised ──▶ Constructed ──▶ Mutated
//!                       ▲              │
//!                       └──────────────┘  init_from_db(.., override_existing = true)
//! ```
//!
//! Serialization (`to_object`, `to_db_object`, `Display`) takes a deep
//! snapshot through the [`walker`] and never changes state.
//!
//! ## Crate Policy
//!
//! - Model types are immutable once built and shared as `Arc<ModelType>`.
//! - A failed strict assignment leaves the previous value in place.
//! - No `.unwrap()` outside tests.

pub mod definition;
pub mod error;
pub mod field;
pub mod model;
pub mod model_type;
pub mod walker;

pub use definition::{CatalogDocument, DefinitionError, FieldDefinition, ModelCatalog, ModelDefinition};
pub use error::ModelError;
pub use field::{Column, FieldDescriptor, FieldValue};
pub use model::{Model, ModelState};
pub use model_type::{ModelType, ModelTypeBuilder};
pub use walker::get_object;

pub use tinyorm_core::KeyCase;
pub use tinyorm_schema::{Schema, SchemaRegistry, ValidationError};

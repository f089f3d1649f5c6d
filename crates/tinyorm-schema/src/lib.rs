//! # tinyorm-schema — Field Schemas and Validation
//!
//! Field schemas in tinyorm are JSON Schema documents (Draft 2020-12)
//! compiled once and shared between every model instance of a type.
//!
//! ## Compilation (`schema`)
//!
//! [`Schema`] wraps a compiled `jsonschema::Validator` together with the
//! source document. Format assertions (`uuid`, `email`, `date-time`, ...)
//! are enabled.
//!
//! ## Registry (`registry`)
//!
//! [`SchemaRegistry`] loads every `*.schema.json` file from a directory and
//! compiles field schemas whose `$ref`s point at those files. References are
//! resolved from memory; the network is never consulted.
//!
//! ## Validation (`validate`)
//!
//! [`validate`] checks a value against a schema and rewrites the engine's
//! message so that it names the property instead of echoing the value:
//! `6 is greater than the maximum of 5` becomes
//! `Article.rating is greater than the maximum of 5`.

pub mod registry;
pub mod schema;
pub mod validate;

pub use registry::SchemaRegistry;
pub use schema::{Schema, SchemaError};
pub use validate::{validate, ValidationError, Violation};

//! # Model Errors

use thiserror::Error;
use tinyorm_schema::ValidationError;

/// Errors raised while populating, validating, or serializing a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A field value violated its schema. The message reads
    /// `<TypeName>.<field> <reason>`.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `init_from_db` was called on a populated instance without override.
    #[error("{model} was already initialised; pass override_existing to re-populate it")]
    AlreadyInitialised {
        /// Name of the model type.
        model: String,
    },

    /// A constructor was handed something other than a JSON object.
    #[error("{model} can only be built from a JSON object, got {found}")]
    NotAnObject {
        /// Name of the model type.
        model: String,
        /// JSON kind that was supplied instead.
        found: &'static str,
    },

    /// JSON text rendering failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    /// The validation error, if this is a schema violation.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

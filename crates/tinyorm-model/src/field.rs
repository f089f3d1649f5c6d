//! # Fields
//!
//! A [`FieldDescriptor`] is the static declaration of a field on a model
//! type; a [`Column`] is the per-instance slot holding its current value and
//! the schema recorded for it; a [`FieldValue`] is the value itself.

use std::sync::Arc;

use serde_json::Value;
use tinyorm_schema::Schema;

use crate::error::ModelError;
use crate::model::Model;
use crate::model_type::ModelType;
use crate::walker;

// ─── Field Descriptors ───────────────────────────────────────────────

/// Declaration of one field on a [`ModelType`].
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    schema: Option<Schema>,
    nested: Option<Arc<ModelType>>,
}

impl FieldDescriptor {
    /// A field with no schema and no nested type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            nested: None,
        }
    }

    /// Attach a schema checked on strict assignment and by `Model::validate`.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Declare that JSON objects assigned to this field (directly or as
    /// array elements) are built into models of `model_type`.
    pub fn with_nested(mut self, model_type: Arc<ModelType>) -> Self {
        self.nested = Some(model_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn nested(&self) -> Option<&Arc<ModelType>> {
        self.nested.as_ref()
    }
}

// ─── Field Values ────────────────────────────────────────────────────

/// The value held by a column.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Plain JSON data copied verbatim on serialization, including `null`,
    /// `0`, `false`, `""` and plain objects.
    Scalar(Value),
    /// A nested model instance.
    Nested(Box<Model>),
    /// An ordered list of values, typically nested models.
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    /// Convert JSON into a field value.
    ///
    /// With a nested type, objects become [`FieldValue::Nested`] models
    /// built through [`Model::from_object`]. Arrays always become
    /// [`FieldValue::Sequence`], converting each element the same way.
    /// Everything else is a [`FieldValue::Scalar`].
    ///
    /// # Errors
    ///
    /// Propagates strict-mode validation failures from nested models.
    pub fn from_json(value: &Value, nested: Option<&Arc<ModelType>>) -> Result<Self, ModelError> {
        match (value, nested) {
            (Value::Object(_), Some(model_type)) => Ok(Self::Nested(Box::new(
                Model::from_object(Arc::clone(model_type), value)?,
            ))),
            (Value::Array(items), _) => {
                let converted: Result<Vec<_>, _> = items
                    .iter()
                    .map(|item| Self::from_json(item, nested))
                    .collect();
                Ok(Self::Sequence(converted?))
            }
            _ => Ok(Self::Scalar(value.clone())),
        }
    }

    /// Plain JSON rendering of this value.
    pub fn to_json(&self) -> Value {
        walker::value_to_json(self)
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Model> {
        match self {
            Self::Nested(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<Model> for FieldValue {
    fn from(model: Model) -> Self {
        Self::Nested(Box::new(model))
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        Self::Sequence(items)
    }
}

// ─── Columns ─────────────────────────────────────────────────────────

/// Per-instance storage for one declared field.
///
/// The schema is recorded on the first write and never replaced.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) value: FieldValue,
    pub(crate) schema: Option<Schema>,
}

impl Column {
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }
}

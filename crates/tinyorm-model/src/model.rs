//! # Model Instances
//!
//! A [`Model`] owns its column map exclusively. Declared fields live in the
//! column map (created lazily on the first declared write); names the model
//! type does not declare are kept as extra properties, which are neither
//! validated nor serialized.
//!
//! ## Assignment
//!
//! [`Model::set_field`] is atomic: for strict model types the new value is
//! validated first, and on failure the column keeps its previous value.
//! The first write of a field records the descriptor's schema on the column;
//! later writes never replace it.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tinyorm_core::{to_camel_case_deep, KeyCase};
use tinyorm_schema::validate;

use crate::error::ModelError;
use crate::field::{Column, FieldValue};
use crate::model_type::ModelType;
use crate::walker;

// ─── Lifecycle State ─────────────────────────────────────────────────

/// Where an instance is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelState {
    /// Created with [`Model::new`]; no declared field written yet.
    Uninitialised,
    /// Populated by a constructor or by `init_from_db`.
    Constructed,
    /// At least one assignment after construction.
    Mutated,
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialised => write!(f, "UNINITIALISED"),
            Self::Constructed => write!(f, "CONSTRUCTED"),
            Self::Mutated => write!(f, "MUTATED"),
        }
    }
}

// ─── Model ───────────────────────────────────────────────────────────

/// An instance of a [`ModelType`].
#[derive(Debug, Clone)]
pub struct Model {
    model_type: Arc<ModelType>,
    columns: Option<BTreeMap<String, Column>>,
    extras: Map<String, Value>,
    state: ModelState,
}

impl Model {
    /// An instance with no fields assigned.
    pub fn new(model_type: Arc<ModelType>) -> Self {
        Self {
            model_type,
            columns: None,
            extras: Map::new(),
            state: ModelState::Uninitialised,
        }
    }

    /// Build an instance by assigning every key of `source`.
    ///
    /// Keys are used as given; see [`Model::from_source`] for inputs that
    /// may be snake_cased.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] if `source` is not an object, or
    /// [`ModelError::Validation`] if the type is strict and a value fails
    /// its schema.
    pub fn from_object(model_type: Arc<ModelType>, source: &Value) -> Result<Self, ModelError> {
        let mut model = Self::new(model_type);
        model.populate(source)?;
        model.state = ModelState::Constructed;
        Ok(model)
    }

    /// Build an instance from an external source whose keys may be in any
    /// casing. Keys are normalised to camelCase at every depth first.
    ///
    /// # Errors
    ///
    /// Same as [`Model::from_object`].
    pub fn from_source(model_type: Arc<ModelType>, source: &Value) -> Result<Self, ModelError> {
        Self::from_object(model_type, &to_camel_case_deep(source))
    }

    /// Re-populate this instance from a database row.
    ///
    /// Keys are normalised to camelCase. The whole row is applied or none
    /// of it is: on error the instance is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AlreadyInitialised`] if the instance already
    /// holds columns and `override_existing` is false, plus the errors of
    /// [`Model::from_object`].
    pub fn init_from_db(&mut self, row: &Value, override_existing: bool) -> Result<(), ModelError> {
        if self.columns.is_some() && !override_existing {
            tracing::debug!(
                model = %self.model_type.name(),
                "refusing to re-initialise populated model"
            );
            return Err(ModelError::AlreadyInitialised {
                model: self.model_type.name().to_string(),
            });
        }

        let mut staged = self.clone();
        staged.populate(&to_camel_case_deep(row))?;
        staged.state = ModelState::Constructed;
        *self = staged;

        tracing::trace!(model = %self.model_type.name(), "initialised from database row");
        Ok(())
    }

    pub fn model_type(&self) -> &Arc<ModelType> {
        &self.model_type
    }

    pub fn type_name(&self) -> &str {
        self.model_type.name()
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    /// Whether any declared field has been written.
    pub fn is_initialised(&self) -> bool {
        self.columns.is_some()
    }

    /// The column map, absent until the first declared write.
    pub fn columns(&self) -> Option<&BTreeMap<String, Column>> {
        self.columns.as_ref()
    }

    /// Current value of a declared field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.columns.as_ref()?.get(name).map(Column::value)
    }

    /// Current value of a declared field as plain JSON.
    pub fn get_json(&self, name: &str) -> Option<Value> {
        self.get(name).map(FieldValue::to_json)
    }

    /// Value of an undeclared property.
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras.get(name)
    }

    /// Assign a field.
    ///
    /// Plain JSON objects and arrays given for a field that declares a
    /// nested type are built into nested models first, exactly as
    /// [`Model::set_json`] does.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Validation`] when the type is strict and the
    /// value fails the field's schema, or when a nested model rejects it;
    /// the previous value is kept.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ModelError> {
        self.assign(name, value.into())?;
        if self.columns.is_some() {
            self.state = ModelState::Mutated;
        }
        Ok(())
    }

    /// Assign a field from JSON, building nested models for fields that
    /// declare a nested type.
    ///
    /// # Errors
    ///
    /// Same as [`Model::set_field`], including failures inside nested models.
    pub fn set_json(&mut self, name: &str, value: &Value) -> Result<(), ModelError> {
        let value = self.convert(name, value)?;
        self.set_field(name, value)
    }

    /// Validate every column that carries a schema, in field declaration
    /// order, then the contents of nested models. Stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Validation`] for the first violating field.
    pub fn validate(&self) -> Result<(), ModelError> {
        let Some(columns) = &self.columns else {
            return Ok(());
        };

        for descriptor in self.model_type.fields() {
            let Some(column) = columns.get(descriptor.name()) else {
                continue;
            };
            if let Some(schema) = column.schema() {
                validate(
                    &column.value().to_json(),
                    schema,
                    Some(&self.property_name(descriptor.name())),
                )?;
            }
            validate_nested(column.value())?;
        }

        Ok(())
    }

    /// Plain camelCase object of all declared fields.
    pub fn to_object(&self) -> Value {
        Value::Object(self.columns.as_ref().map(walker::get_object).unwrap_or_default())
    }

    /// Plain object with snake_case keys for row/column stores.
    pub fn to_db_object(&self) -> Value {
        self.to_object_with_case(KeyCase::Snake)
    }

    /// Plain object with keys in `case`.
    pub fn to_object_with_case(&self, case: KeyCase) -> Value {
        let object = self.to_object();
        match case {
            KeyCase::Camel => object,
            KeyCase::Snake => tinyorm_core::to_snake_case_deep(&object),
        }
    }

    /// JSON text of [`Model::to_object_with_case`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Serialization`] if rendering fails.
    pub fn to_json_string(&self, case: KeyCase) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.to_object_with_case(case))?)
    }

    fn property_name(&self, field: &str) -> String {
        format!("{}.{}", self.model_type.name(), field)
    }

    fn populate(&mut self, source: &Value) -> Result<(), ModelError> {
        let Value::Object(map) = source else {
            return Err(ModelError::NotAnObject {
                model: self.model_type.name().to_string(),
                found: json_kind(source),
            });
        };

        for (name, value) in map {
            let value = self.convert(name, value)?;
            self.assign(name, value)?;
        }
        Ok(())
    }

    fn convert(&self, name: &str, value: &Value) -> Result<FieldValue, ModelError> {
        let nested = self.model_type.field(name).and_then(|f| f.nested());
        FieldValue::from_json(value, nested)
    }

    fn assign(&mut self, name: &str, value: FieldValue) -> Result<(), ModelError> {
        let Some(descriptor) = self.model_type.field(name) else {
            self.extras.insert(name.to_string(), value.to_json());
            return Ok(());
        };
        let value = match descriptor.nested() {
            Some(nested) => attach_nested(value, nested)?,
            None => value,
        };

        let schema = self
            .columns
            .as_ref()
            .and_then(|columns| columns.get(name))
            .and_then(|column| column.schema.clone())
            .or_else(|| descriptor.schema().cloned());

        if self.model_type.is_strict() {
            if let Some(schema) = &schema {
                if let Err(e) = validate(&value.to_json(), schema, Some(&self.property_name(name))) {
                    tracing::debug!(
                        model = %self.model_type.name(),
                        field = %name,
                        error = %e,
                        "rejected strict assignment"
                    );
                    return Err(e.into());
                }
            }
        }

        match self.columns.get_or_insert_with(BTreeMap::new).entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                let column = occupied.get_mut();
                column.value = value;
                if column.schema.is_none() {
                    column.schema = schema;
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Column { value, schema });
            }
        }
        Ok(())
    }
}

/// Build nested models out of plain JSON objects and arrays left in `value`.
fn attach_nested(value: FieldValue, nested: &Arc<ModelType>) -> Result<FieldValue, ModelError> {
    match value {
        FieldValue::Scalar(json @ (Value::Object(_) | Value::Array(_))) => {
            FieldValue::from_json(&json, Some(nested))
        }
        FieldValue::Sequence(items) => items
            .into_iter()
            .map(|item| attach_nested(item, nested))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::Sequence),
        other => Ok(other),
    }
}

fn validate_nested(value: &FieldValue) -> Result<(), ModelError> {
    match value {
        FieldValue::Scalar(_) => Ok(()),
        FieldValue::Nested(model) => model.validate(),
        FieldValue::Sequence(items) => items.iter().try_for_each(validate_nested),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_object())
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_object().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use serde_json::json;
    use tinyorm_schema::Schema;

    fn rating_schema() -> Schema {
        Schema::new(json!({"type": "integer", "minimum": 1, "maximum": 5})).unwrap()
    }

    fn review_type(strict: bool) -> Arc<ModelType> {
        ModelType::builder("Review")
            .strict(strict)
            .field(FieldDescriptor::new("id"))
            .field(FieldDescriptor::new("rating").with_schema(rating_schema()))
            .build()
    }

    #[test]
    fn new_model_is_empty() {
        let m = Model::new(review_type(false));
        assert_eq!(m.state(), ModelState::Uninitialised);
        assert!(!m.is_initialised());
        assert_eq!(m.to_object(), json!({}));
        assert!(m.validate().is_ok());
    }

    #[test]
    fn column_map_is_created_on_first_declared_write() {
        let mut m = Model::new(review_type(false));
        m.set_field("unknownThing", json!(1)).unwrap();
        assert!(!m.is_initialised());
        assert_eq!(m.state(), ModelState::Uninitialised);
        m.set_field("id", json!(1)).unwrap();
        assert!(m.is_initialised());
        assert_eq!(m.state(), ModelState::Mutated);
    }

    #[test]
    fn schema_is_recorded_on_first_write() {
        let mut m = Model::new(review_type(false));
        m.set_field("rating", json!(2)).unwrap();
        m.set_field("id", json!(1)).unwrap();
        let columns = m.columns().unwrap();
        assert!(columns["rating"].schema().is_some());
        assert!(columns["id"].schema().is_none());

        m.set_field("rating", json!(3)).unwrap();
        let source = m.columns().unwrap()["rating"].schema().unwrap().source().clone();
        assert_eq!(source, json!({"type": "integer", "minimum": 1, "maximum": 5}));
    }

    #[test]
    fn strict_assignment_is_atomic() {
        let mut m = Model::from_object(review_type(true), &json!({"rating": 1})).unwrap();
        let err = m.set_field("rating", json!(6)).unwrap_err();
        assert!(err.to_string().starts_with("Review.rating"), "{err}");
        assert_eq!(m.get_json("rating"), Some(json!(1)));
        assert_eq!(m.state(), ModelState::Constructed);

        m.set_field("rating", json!(5)).unwrap();
        assert_eq!(m.get_json("rating"), Some(json!(5)));
    }

    #[test]
    fn strict_constructor_rejects_bad_input() {
        let err = Model::from_object(review_type(true), &json!({"rating": 0})).unwrap_err();
        assert!(err.as_validation().is_some());
    }

    #[test]
    fn lenient_assignment_defers_to_validate() {
        let mut m = Model::from_object(review_type(false), &json!({"rating": 1})).unwrap();
        m.set_field("rating", json!(9)).unwrap();
        assert_eq!(m.get_json("rating"), Some(json!(9)));
        let err = m.validate().unwrap_err();
        assert!(err.to_string().starts_with("Review.rating"));
    }

    #[test]
    fn undeclared_keys_are_extras() {
        let m = Model::from_object(review_type(true), &json!({"id": 1, "note": "hi"})).unwrap();
        assert_eq!(m.extra("note"), Some(&json!("hi")));
        assert!(m.get("note").is_none());
        assert_eq!(m.to_object(), json!({"id": 1}));
    }

    #[test]
    fn non_object_source_is_rejected() {
        let err = Model::from_object(review_type(false), &json!([1, 2])).unwrap_err();
        match err {
            ModelError::NotAnObject { model, found } => {
                assert_eq!(model, "Review");
                assert_eq!(found, "array");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn init_from_db_guards_populated_instances() {
        let mut m = Model::from_object(review_type(false), &json!({"id": 1})).unwrap();
        let err = m.init_from_db(&json!({"id": 2}), false).unwrap_err();
        assert!(matches!(err, ModelError::AlreadyInitialised { .. }));
        assert_eq!(m.get_json("id"), Some(json!(1)));

        m.init_from_db(&json!({"id": 2}), true).unwrap();
        assert_eq!(m.get_json("id"), Some(json!(2)));
        assert_eq!(m.state(), ModelState::Constructed);
    }

    #[test]
    fn init_from_db_is_all_or_nothing() {
        let mut m = Model::new(review_type(true));
        let err = m.init_from_db(&json!({"id": 7, "rating": 99}), false);
        assert!(err.is_err());
        assert!(!m.is_initialised());
        assert_eq!(m.state(), ModelState::Uninitialised);
    }

    #[test]
    fn display_and_serialize_match_to_object() {
        let m = Model::from_object(review_type(false), &json!({"id": 1, "rating": 3})).unwrap();
        let text = m.to_string();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, m.to_object());
        assert_eq!(serde_json::to_value(&m).unwrap(), m.to_object());
    }

    #[test]
    fn state_display() {
        assert_eq!(ModelState::Mutated.to_string(), "MUTATED");
        assert_eq!(ModelState::Uninitialised.to_string(), "UNINITIALISED");
    }
}

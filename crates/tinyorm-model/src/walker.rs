//! # Object Walker
//!
//! Rebuilds a plain JSON object from a model's column map, dropping schema
//! metadata. Every branch clones, so the result is a snapshot: mutating the
//! model afterwards never changes an object that was already produced.
//!
//! ## Rules
//!
//! 1. `Scalar`: copied verbatim. Falsy values (`0`, `false`, `""`, `null`)
//!    are values like any other.
//! 2. `Nested`: recurse into the nested model's columns.
//! 3. `Sequence`: array of the walked elements.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::field::{Column, FieldValue};

/// Plain object with one entry per column.
pub fn get_object(columns: &BTreeMap<String, Column>) -> Map<String, Value> {
    columns
        .iter()
        .map(|(name, column)| (name.clone(), value_to_json(column.value())))
        .collect()
}

pub(crate) fn value_to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Scalar(v) => v.clone(),
        FieldValue::Nested(model) => model.to_object(),
        FieldValue::Sequence(items) => Value::Array(items.iter().map(value_to_json).collect()),
    }
}

//! # Deep Case Conversion
//!
//! Rebuilds a JSON value with every object key passed through a rename
//! function. The result is a fresh tree: nothing is shared with the input,
//! so later mutation of either side never leaks into the other.
//!
//! ## Rules
//!
//! 1. `object`: each key renamed, each value recursed.
//! 2. `array`: each element recursed, so objects inside arrays (and arrays
//!    inside arrays) are converted too.
//! 3. `null`, `bool`, `number`, `string`: copied unchanged.
//!
//! When two keys collapse to the same name after renaming, the value of the
//! key visited later wins.

use serde_json::{Map, Value};

use crate::casing::{to_camel_case, to_snake_case};

/// Deep-copy `value`, renaming every object key with `rename`.
pub fn change_case_deep<F>(value: &Value, rename: F) -> Value
where
    F: Fn(&str) -> String,
{
    convert_value(value, &rename)
}

/// Deep-copy `value` with all keys in snake_case.
pub fn to_snake_case_deep(value: &Value) -> Value {
    change_case_deep(value, to_snake_case)
}

/// Deep-copy `value` with all keys in camelCase.
pub fn to_camel_case_deep(value: &Value) -> Value {
    change_case_deep(value, to_camel_case)
}

fn convert_value<F>(value: &Value, rename: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
        Value::Object(map) => {
            let mut converted = Map::with_capacity(map.len());
            for (k, v) in map {
                converted.insert(rename(k), convert_value(v, rename));
            }
            Value::Object(converted)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| convert_value(item, rename)).collect())
        }
    }
}

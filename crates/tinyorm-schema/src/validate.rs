//! # Property-Aware Validation
//!
//! Runs a value through a [`Schema`] and reports failures in terms of the
//! model property that held the value.
//!
//! The schema engine phrases most messages as `<value> <reason>`, e.g.
//! `6 is greater than the maximum of 5`. When a property name is supplied,
//! the leading value rendering is replaced by the property name. Messages
//! that do not start with the value (e.g. missing required keys) get the
//! property name prepended instead, so every rewritten message starts with
//! the property.
//!
//! Only a violation of the whole value is rewritten that way. A violation
//! inside it (an array element, an object member) keeps the engine message
//! and is located by appending the instance path to the property:
//! `Post.tags/1 "x" is not of type "integer"`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::schema::Schema;

/// A single violation reported by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating location in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// The engine's own description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A value failed its schema.
///
/// `Display` yields the rewritten message of the first violation, which
/// starts with the property name when one was given.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ValidationError {
    property: Option<String>,
    message: String,
    violations: Vec<Violation>,
}

impl ValidationError {
    /// The property the value was validated for, if any.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// The rewritten message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every violation reported by the engine, in report order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Validate `value` against `schema`.
///
/// On failure the error message is the engine's message for the first
/// violation with the evaluated value replaced by `property_name`.
///
/// # Errors
///
/// Returns [`ValidationError`] when the value does not satisfy the schema.
pub fn validate(
    value: &Value,
    schema: &Schema,
    property_name: Option<&str>,
) -> Result<(), ValidationError> {
    let mut message = None;
    let mut violations = Vec::new();

    for error in schema.validator().iter_errors(value) {
        let raw = error.to_string();
        let instance_path = error.instance_path.to_string();
        if message.is_none() {
            message = Some(match property_name {
                Some(property) if instance_path.is_empty() => {
                    rewrite_message(&raw, &error.instance, property)
                }
                Some(property) => format!("{property}{instance_path} {raw}"),
                None => raw.clone(),
            });
        }
        violations.push(Violation {
            instance_path,
            schema_path: error.schema_path.to_string(),
            message: raw,
        });
    }

    match message {
        None => Ok(()),
        Some(message) => Err(ValidationError {
            property: property_name.map(str::to_string),
            message,
            violations,
        }),
    }
}

fn rewrite_message(message: &str, instance: &Value, property: &str) -> String {
    let rendered = instance.to_string();
    match message.strip_prefix(rendered.as_str()) {
        Some(rest) if !rendered.is_empty() => format!("{property}{rest}"),
        _ => format!("{property} {message}"),
    }
}

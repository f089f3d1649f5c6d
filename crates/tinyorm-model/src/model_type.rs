//! # Model Types
//!
//! A model type is the registration of a model: its name (used in
//! validation messages), its strict flag, and its field descriptors in
//! declaration order. It is built once and read-only thereafter; every
//! instance holds an `Arc` to it.

use std::sync::Arc;

use crate::field::FieldDescriptor;

/// A registered model type.
#[derive(Debug)]
pub struct ModelType {
    name: String,
    strict: bool,
    fields: Vec<FieldDescriptor>,
}

impl ModelType {
    /// Start declaring a model type called `name`.
    pub fn builder(name: impl Into<String>) -> ModelTypeBuilder {
        ModelTypeBuilder {
            name: name.into(),
            strict: false,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether every assignment is validated immediately.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Field descriptors in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Builder for [`ModelType`].
#[derive(Debug)]
pub struct ModelTypeBuilder {
    name: String,
    strict: bool,
    fields: Vec<FieldDescriptor>,
}

impl ModelTypeBuilder {
    /// Validate every assignment as it happens.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Declare a field. Redeclaring a name replaces the earlier descriptor
    /// but keeps its position.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == descriptor.name()) {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    pub fn build(self) -> Arc<ModelType> {
        Arc::new(ModelType {
            name: self.name,
            strict: self.strict,
            fields: self.fields,
        })
    }
}

//! Traits for schema polymorphism.
//!
//! This module provides the [`SchemaLike`] trait that lets different schema
//! types be composed for nested validation, and that exposes the literal
//! declarations union definitions are checked against.

use stillwater::Validation;

use crate::data::Data;
use crate::path::FieldPath;

use super::issue::SchemaIssues;

/// What a schema declares for one of its object fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldLiteral<'a> {
    /// The schema does not describe an object.
    NotAnObject,
    /// The field is missing or is not a literal.
    NotALiteral,
    /// The field is a literal with these allowed values.
    Values(&'a [Data]),
}

/// A schema that validates data trees.
///
/// The `Send + Sync` bounds allow schemas to be memoized in statics and
/// shared across threads.
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().positive());
///
/// let input = Data::from(json!({"name": "Ada", "age": 36}));
/// let result = schema.validate(&input, &FieldPath::root());
/// assert!(result.is_success());
/// ```
pub trait SchemaLike: Send + Sync {
    /// The output type produced by successful validation.
    type Output;

    /// Validates a value against this schema.
    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<Self::Output, SchemaIssues>;

    /// Validates a value and returns the result as a data tree, so schemas
    /// with different outputs can be stored side by side.
    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues>;

    /// Returns the allowed values if this schema is a literal.
    fn literal_values(&self) -> Option<&[Data]> {
        None
    }

    /// Returns what this schema declares for the object field `name`.
    fn field_literal(&self, name: &str) -> FieldLiteral<'_> {
        let _ = name;
        FieldLiteral::NotAnObject
    }
}

//! Schemas for validating data trees.
//!
//! Each schema validates a [`Data`](crate::Data) value at a
//! [`FieldPath`](crate::FieldPath) and accumulates every issue it finds
//! rather than stopping at the first. Schemas back the schema form of
//! [`value_object!`](crate::value_object!) and the variants of a
//! [`Union`](crate::Union).
//!
//! # Example
//!
//! ```rust
//! use valobj::{Data, FieldPath, Schema, SchemaLike};
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! let result = schema.validate(&Data::from("hello"), &FieldPath::root());
//! assert!(result.is_success());
//! ```

mod array;
mod issue;
mod numeric;
mod object;
mod scalar;
mod string;
mod traits;

pub use array::ArraySchema;
pub use issue::{SchemaIssue, SchemaIssues};
pub use numeric::IntegerSchema;
pub use object::{AdditionalPropertiesSetting, ObjectSchema};
pub use scalar::{BooleanSchema, LiteralSchema};
pub use string::StringSchema;
pub use traits::{FieldLiteral, SchemaLike};

use crate::data::Data;
use crate::resolver::ValueObjectSchema;
use crate::serializer::ToData;
use crate::union::{Union, UnionSchema};
use crate::value_object::ValueObject;

/// Entry point for creating schemas.
///
/// # Example
///
/// ```rust
/// use valobj::Schema;
///
/// let dog = Schema::object()
///     .field("type", Schema::literal("dog"))
///     .field("woofs", Schema::boolean());
///
/// let email = Schema::string()
///     .pattern(r"@")
///     .unwrap()
///     .error("must contain @");
/// ```
pub struct Schema;

impl Schema {
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates an integer schema; floats are rejected.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates a literal schema with a single allowed value.
    pub fn literal(value: impl Into<Data>) -> LiteralSchema {
        LiteralSchema::new([value.into()])
    }

    /// Creates a literal schema accepting any of `values`.
    pub fn literals<I, V>(values: I) -> LiteralSchema
    where
        I: IntoIterator<Item = V>,
        V: Into<Data>,
    {
        LiteralSchema::new(values)
    }

    pub fn array<S: SchemaLike>(item_schema: S) -> ArraySchema<S> {
        ArraySchema::new(item_schema)
    }

    /// Creates an object schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use valobj::{Data, FieldPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("name", Schema::string().min_len(1))
    ///     .optional("email", Schema::string())
    ///     .default("role", Schema::string(), "user")
    ///     .additional_properties(false);
    ///
    /// let result = schema.validate(&Data::from(json!({"name": "Bob"})), &FieldPath::root());
    /// assert_eq!(result.into_result().unwrap()["role"], Data::from("user"));
    /// ```
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a schema that parses a field into the value object `T`.
    ///
    /// The value object's own errors come back as schema issues at the
    /// field's path joined with the error's own path.
    pub fn value_object<T: ValueObject>() -> ValueObjectSchema<T> {
        ValueObjectSchema::new()
    }

    /// Creates a schema that parses a field with a discriminated union.
    pub fn union<U>(union: &Union<U>) -> UnionSchema<'_, U>
    where
        U: ToData + Send + Sync + 'static,
    {
        union.schema()
    }
}

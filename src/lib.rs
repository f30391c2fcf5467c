//! # valobj
//!
//! Immutable value objects built from untrusted, JSON-like input.
//!
//! ## Overview
//!
//! A value object is only ever constructed through its parser, which
//! validates the input against a declared shape. Parsing threads a
//! [`ValidationAggregator`] through arbitrarily nested structures, so one
//! failed parse reports every problem found anywhere in the input, each
//! under its field path, rather than only the first. Validated objects
//! serialize back to plain data.
//!
//! ## Core Types
//!
//! - [`Data`]: the JSON-like input and output tree (absent values are distinct from `null`)
//! - [`ValidationAggregator`]: path-scoped error collection shared by a parse call
//! - [`AggregatedValidationError`]: every failure found, in discovery order
//! - [`ValueObject`] and [`value_object!`]: declaring and using value-object types
//! - [`Union`]: tag-dispatched parsing over several schema-backed variants
//! - [`Schema`]: builders for the schemas that back value objects
//!
//! ## Example
//!
//! ```rust
//! use valobj::{value_object, Data, Shaped, ValidationAggregator, ValueObject};
//! use serde_json::json;
//!
//! fn parse_email(value: &Data, errs: &ValidationAggregator) -> Shaped<String> {
//!     match value.as_str() {
//!         Some(email) if email.contains('@') => Ok(email.to_string()),
//!         Some(_) => errs.fail("must contain an @"),
//!         None => errs.fail("must be a string"),
//!     }
//! }
//!
//! value_object! {
//!     pub struct Email(String) = parse_email;
//! }
//!
//! let email = Email::from_json(json!("a@b.com")).unwrap();
//! assert_eq!(email.to_json(), json!("a@b.com"));
//!
//! let error = Email::from_json(json!(42)).unwrap_err();
//! assert_eq!(error.to_string(), "Validation Error: must be a string");
//! ```

pub mod aggregator;
pub mod data;
pub mod error;
pub mod parser;
pub mod path;
pub mod resolver;
pub mod schema;
pub mod serializer;
pub mod union;
pub mod value_object;

pub use aggregator::{ShapeError, Shaped, ValidationAggregator};
pub use data::{Data, Instance, Props};
pub use error::{
    AggregatedValidationError, Cause, ConfigError, ErrorInfo, GroupedErrors, Message,
    ValidationError,
};
pub use parser::{Parser, ShapeFn};
pub use path::{FieldPath, PathSegment};
pub use resolver::{resolve, ValueObjectSchema};
pub use schema::{
    ArraySchema, BooleanSchema, FieldLiteral, IntegerSchema, LiteralSchema, ObjectSchema, Schema,
    SchemaIssue, SchemaIssues, SchemaLike, StringSchema,
};
pub use serializer::{recursive_json, Serializable, Serializer, ToData};
pub use union::{Union, UnionSchema, Variant};
pub use value_object::{Frozen, SchemaBacked, ValueObject};

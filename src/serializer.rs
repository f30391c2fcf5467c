//! Projection of value objects back to plain data.
//!
//! Serialization is a total, structural walk: it never constructs value
//! objects and never fails. Nested value objects are recognized through the
//! [`Serializable`] capability and delegate to their own serializer.

use std::any::Any;

use indexmap::IndexMap;
use serde_json::Value;

use crate::data::Data;
use crate::value_object::ValueObject;

/// The capability of a value object to project itself to plain data.
///
/// Every [`ValueObject`] implements it; it is what lets a [`Data`] tree hold
/// value objects of any type.
pub trait Serializable: Any + Send + Sync {
    /// Returns the value object's type name.
    fn type_name(&self) -> &'static str;

    /// Returns the plain-data projection of this object.
    fn serialize(&self) -> Data;

    /// Returns `self` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: ValueObject> Serializable for T {
    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn serialize(&self) -> Data {
        self.serializer().as_json()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Conversion of a payload into a data tree.
///
/// Implemented for primitives, `Data`, options, vectors, keyed maps and
/// (through [`value_object!`](crate::value_object!)) every value object type,
/// which embeds itself as an instance.
pub trait ToData {
    fn to_data(&self) -> Data;
}

impl ToData for Data {
    fn to_data(&self) -> Data {
        self.clone()
    }
}

impl ToData for String {
    fn to_data(&self) -> Data {
        Data::String(self.clone())
    }
}

impl ToData for bool {
    fn to_data(&self) -> Data {
        Data::Bool(*self)
    }
}

impl ToData for i64 {
    fn to_data(&self) -> Data {
        Data::from(*self)
    }
}

impl ToData for i32 {
    fn to_data(&self) -> Data {
        Data::from(*self)
    }
}

impl ToData for u64 {
    fn to_data(&self) -> Data {
        Data::from(*self)
    }
}

impl ToData for f64 {
    fn to_data(&self) -> Data {
        Data::from(*self)
    }
}

impl ToData for Value {
    fn to_data(&self) -> Data {
        Data::from(self)
    }
}

impl<T: ToData> ToData for Option<T> {
    fn to_data(&self) -> Data {
        match self {
            Some(value) => value.to_data(),
            None => Data::Undefined,
        }
    }
}

impl<T: ToData> ToData for Vec<T> {
    fn to_data(&self) -> Data {
        Data::Array(self.iter().map(ToData::to_data).collect())
    }
}

impl<T: ToData> ToData for IndexMap<String, T> {
    fn to_data(&self) -> Data {
        Data::Object(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_data()))
                .collect(),
        )
    }
}

/// Serializes one already-constructed value object.
///
/// A `Serializer` borrows its object; every call to [`Serializer::as_json`]
/// walks the payload again.
///
/// # Example
///
/// ```rust
/// use valobj::{value_object, Data, Shaped, ValidationAggregator, ValueObject};
///
/// fn parse_name(value: &Data, errs: &ValidationAggregator) -> Shaped<String> {
///     match value.as_str() {
///         Some(s) => Ok(s.to_string()),
///         None => errs.fail("must be a string"),
///     }
/// }
///
/// value_object! {
///     pub struct Name(String) = parse_name;
/// }
///
/// let name = Name::create("Ada").unwrap();
/// assert_eq!(name.serializer().as_json(), Data::from("Ada"));
/// ```
#[derive(Debug)]
pub struct Serializer<'a, T: ValueObject> {
    object: &'a T,
}

impl<'a, T: ValueObject> Serializer<'a, T> {
    pub fn new(object: &'a T) -> Self {
        Self { object }
    }

    /// Returns the plain-data form of the object's payload.
    pub fn as_json(&self) -> Data {
        recursive_json(&self.object.value().to_data())
    }

    /// Returns the serialized form lowered to `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        self.as_json().to_json()
    }
}

/// Recursively projects a data tree to plain data.
///
/// Primitives, `Null` and `Undefined` pass through, arrays and objects are
/// walked element-wise (keys keep their order), and embedded value objects
/// delegate to their own serializer.
pub fn recursive_json(value: &Data) -> Data {
    match value {
        Data::Undefined | Data::Null | Data::Bool(_) | Data::Number(_) | Data::String(_) => {
            value.clone()
        }
        Data::Array(items) => Data::Array(items.iter().map(recursive_json).collect()),
        Data::Instance(instance) => instance.serialize(),
        Data::Object(fields) => Data::Object(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), recursive_json(value)))
                .collect(),
        ),
    }
}

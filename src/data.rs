//! Plain-data trees.
//!
//! [`Data`] is the JSON-like input and output shape of every parse and
//! serialization. It differs from `serde_json::Value` in two ways: absent
//! values (`Undefined`) are distinct from `Null`, and a tree may embed
//! already-constructed value objects ([`Instance`]) next to raw values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Number, Value};

use crate::serializer::Serializable;

/// Keyed fields of an object, in insertion order.
pub type Props = IndexMap<String, Data>;

static UNDEFINED: Data = Data::Undefined;

/// A JSON-like tree of raw and already-parsed values.
///
/// # Example
///
/// ```rust
/// use valobj::Data;
/// use serde_json::json;
///
/// let data = Data::from(json!({ "email": "a@b.com", "tags": ["x"] }));
///
/// assert_eq!(data.get("email").as_str(), Some("a@b.com"));
/// assert!(data.get("missing").is_undefined());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Data {
    /// Not provided.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Data>),
    Object(Props),
    /// An already-constructed value object.
    Instance(Instance),
}

impl Data {
    /// Builds an object from key/value pairs, keeping their order.
    pub fn object<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Data>,
        I: IntoIterator<Item = (K, V)>,
    {
        Data::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the field `key` of an object, or `Undefined` when absent or
    /// when this is not an object.
    pub fn get(&self, key: &str) -> &Data {
        match self {
            Data::Object(fields) => fields.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Data::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Data::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Data::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Data]> {
        match self {
            Data::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Props> {
        match self {
            Data::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Data::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Returns the embedded value object if it is of type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_instance().and_then(Instance::downcast_ref::<T>)
    }

    /// Returns the name of this value's kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Data::Undefined => "undefined",
            Data::Null => "null",
            Data::Bool(_) => "boolean",
            Data::Number(_) => "number",
            Data::String(_) => "string",
            Data::Array(_) => "array",
            Data::Object(_) => "object",
            Data::Instance(instance) => instance.type_name(),
        }
    }

    /// Lowers this tree to a `serde_json::Value` for transport.
    ///
    /// Embedded instances are serialized first. `Undefined` object fields are
    /// dropped, `Undefined` array slots and a top-level `Undefined` become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Data::Undefined | Data::Null => Value::Null,
            Data::Bool(b) => Value::Bool(*b),
            Data::Number(n) => Value::Number(n.clone()),
            Data::String(s) => Value::String(s.clone()),
            Data::Array(items) => Value::Array(items.iter().map(Data::to_json).collect()),
            Data::Object(fields) => Value::Object(
                fields
                    .iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Data::Instance(instance) => instance.serialize().to_json(),
        }
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Data::Undefined, Data::Undefined) | (Data::Null, Data::Null) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Number(a), Data::Number(b)) => a == b,
            (Data::String(a), Data::String(b)) => a == b,
            (Data::Array(a), Data::Array(b)) => a == b,
            (Data::Object(a), Data::Object(b)) => a == b,
            (Data::Instance(a), Data::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Data::Null,
            Value::Bool(b) => Data::Bool(b),
            Value::Number(n) => Data::Number(n),
            Value::String(s) => Data::String(s),
            Value::Array(items) => Data::Array(items.into_iter().map(Data::from).collect()),
            Value::Object(fields) => {
                Data::Object(fields.into_iter().map(|(k, v)| (k, Data::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for Data {
    fn from(value: &Value) -> Self {
        Data::from(value.clone())
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::String(s.to_string())
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::String(s)
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Bool(b)
    }
}

impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Data::Number(n.into())
    }
}

impl From<i32> for Data {
    fn from(n: i32) -> Self {
        Data::Number(n.into())
    }
}

impl From<u64> for Data {
    fn from(n: u64) -> Self {
        Data::Number(n.into())
    }
}

impl From<f64> for Data {
    /// Non-finite numbers have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Data::Null, Data::Number)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map_or(Data::Undefined, Into::into)
    }
}

impl<T: Into<Data>> From<Vec<T>> for Data {
    fn from(items: Vec<T>) -> Self {
        Data::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Props> for Data {
    fn from(fields: Props) -> Self {
        Data::Object(fields)
    }
}

impl From<&Data> for Data {
    fn from(data: &Data) -> Self {
        data.clone()
    }
}

/// A value object embedded in a data tree.
///
/// Cloning an `Instance` shares the same object; the embedded value object
/// keeps its identity when it is taken back out with [`Instance::downcast_ref`].
#[derive(Clone)]
pub struct Instance(Arc<dyn Serializable>);

impl Instance {
    pub fn new<T: Serializable>(object: T) -> Self {
        Self(Arc::new(object))
    }

    /// Returns the embedded object if it is of type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Returns the value object's type name.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Delegates to the embedded object's own serializer.
    pub fn serialize(&self) -> Data {
        self.0.serialize()
    }
}

impl PartialEq for Instance {
    /// Instances compare by value: same type and equal serialized forms.
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.serialize() == other.serialize()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.type_name()).field(&self.serialize()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_value() {
        let data = Data::from(json!({"a": [1, null, "x"], "b": true}));
        let items = data.get("a").as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[1].is_null());
        assert_eq!(data.get("b").as_bool(), Some(true));
    }

    #[test]
    fn test_missing_field_is_undefined_not_null() {
        let data = Data::from(json!({"a": null}));
        assert!(data.get("a").is_null());
        assert!(data.get("b").is_undefined());
        assert!(Data::from("text").get("a").is_undefined());
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let data = Data::object([("z", 1), ("a", 2)]);
        let keys: Vec<&String> = data.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_to_json_drops_undefined_fields() {
        let data = Data::object([
            ("email", Data::from("a@b.com")),
            ("addresses", Data::Undefined),
        ]);
        assert_eq!(data.to_json(), json!({"email": "a@b.com"}));
        assert_eq!(
            Data::Array(vec![Data::Undefined, Data::from(1)]).to_json(),
            json!([null, 1])
        );
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert!(Data::from(f64::NAN).is_null());
        assert_eq!(Data::from(1.5).as_f64(), Some(1.5));
    }

    #[test]
    fn test_option_none_is_undefined() {
        assert!(Data::from(None::<String>).is_undefined());
        assert_eq!(Data::from(Some("x")), Data::from("x"));
    }
}

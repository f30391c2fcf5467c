//! Immutable value objects.
//!
//! A value object is a validated, immutable wrapper around a payload that is
//! only constructed through its parser. Types are declared with the
//! [`value_object!`](crate::value_object!) macro, either from a shape-parsing
//! function or from a schema.
//!
//! # Example
//!
//! ```rust
//! use valobj::{value_object, Data, Shaped, ValidationAggregator, ValueObject};
//! use serde_json::json;
//!
//! fn parse_email(value: &Data, errs: &ValidationAggregator) -> Shaped<String> {
//!     let Some(email) = value.as_str() else {
//!         return errs.fail("must be a string");
//!     };
//!     if !email.contains('@') {
//!         errs.add_error("must contain an @");
//!     }
//!     Ok(email.to_string())
//! }
//!
//! value_object! {
//!     /// An email address.
//!     pub struct Email(String) = parse_email;
//! }
//!
//! let email = Email::from_json(json!("a@b.com")).unwrap();
//! assert_eq!(email.value(), "a@b.com");
//!
//! let error = Email::create("not-an-email").unwrap_err();
//! assert_eq!(error.to_string(), "Validation Error: must contain an @");
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::aggregator::{Shaped, ValidationAggregator};
use crate::data::{Data, Instance};
use crate::error::AggregatedValidationError;
use crate::parser::{ParseToken, Parser};
use crate::schema::SchemaLike;
use crate::serializer::{Serializer, ToData};

/// An immutable, shared payload.
///
/// Clones share the same allocation; [`Frozen::ptr_eq`] tells whether two
/// handles are the very same payload. Equality compares values.
pub struct Frozen<T>(Arc<T>);

impl<T> Frozen<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns true if both handles point at the same payload.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }
}

impl<T> Clone for Frozen<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Frozen<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Frozen<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Frozen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// A validated, immutable wrapper around a payload.
///
/// Implementations are generated by [`value_object!`](crate::value_object!);
/// the provided methods are the public entry points. Instances only come out
/// of the parser, so a payload cannot be wrapped without being validated:
///
/// ```compile_fail
/// use valobj::parser::ParseToken;
/// use valobj::{value_object, Data, Frozen, Shaped, ValidationAggregator, ValueObject};
///
/// fn parse_email(value: &Data, errs: &ValidationAggregator) -> Shaped<String> {
///     match value.as_str() {
///         Some(email) if email.contains('@') => Ok(email.to_string()),
///         _ => errs.fail("must contain an @"),
///     }
/// }
///
/// value_object! {
///     pub struct Email(String) = parse_email;
/// }
///
/// let email = Email::from_frozen(Frozen::new("no-at-sign".to_string()), ParseToken(()));
/// ```
pub trait ValueObject: Clone + fmt::Debug + Send + Sync + 'static {
    /// The validated payload.
    type Value: ToData + Send + Sync + 'static;

    /// The type name used in logs and debug output.
    const NAME: &'static str;

    /// The shape-parsing function.
    fn shape(input: &Data, errs: &ValidationAggregator) -> Shaped<Self::Value>;

    /// Wraps a payload that the parser has just validated.
    #[doc(hidden)]
    fn from_frozen(value: Frozen<Self::Value>, token: ParseToken) -> Self;

    /// Returns the frozen payload handle.
    fn frozen(&self) -> &Frozen<Self::Value>;

    /// Returns the parser bound to this type, created once on first use.
    fn parser() -> &'static Parser<Self>;

    /// Returns the validated payload.
    fn value(&self) -> &Self::Value {
        self.frozen()
    }

    /// Parses an instance, a primitive, or a mixed raw/parsed structure.
    fn create(data: impl Into<Data>) -> Result<Self, AggregatedValidationError> {
        Self::parser().create(data)
    }

    /// Parses into a caller-supplied aggregator without discarding siblings' errors.
    fn create_in(
        data: &Data,
        errs: &ValidationAggregator,
    ) -> Result<Self, AggregatedValidationError> {
        Self::parser().create_in(data, errs)
    }

    /// Re-hydrates previously serialized output (or passes an instance through).
    fn from_json(data: impl Into<Data>) -> Result<Self, AggregatedValidationError> {
        Self::parser().from_json(data)
    }

    /// Re-hydrates into a caller-supplied aggregator.
    fn from_json_in(
        data: &Data,
        errs: &ValidationAggregator,
    ) -> Result<Self, AggregatedValidationError> {
        Self::parser().from_json_in(data, errs)
    }

    fn serializer(&self) -> Serializer<'_, Self> {
        Serializer::new(self)
    }

    /// Returns the plain-data form of this object.
    fn as_json(&self) -> Data {
        self.serializer().as_json()
    }

    /// Returns the plain-data form lowered to `serde_json::Value`.
    fn to_json(&self) -> Value {
        self.serializer().to_json()
    }

    /// Returns true if both objects share the same payload (reference identity).
    fn same_instance(&self, other: &Self) -> bool {
        Frozen::ptr_eq(self.frozen(), other.frozen())
    }

    /// Embeds this object into a data tree.
    fn into_data(self) -> Data {
        Data::Instance(Instance::new(self))
    }
}

/// A value object whose shape is described by a schema.
pub trait SchemaBacked: ValueObject {
    type Schema: SchemaLike<Output = Self::Value> + 'static;

    /// Returns the schema, built once on first use.
    fn schema() -> &'static Self::Schema;
}

/// Declares a value object type.
///
/// Two forms are supported:
///
/// * `pub struct Name(Payload) = shape_fn;` binds a shape-parsing function
///   `fn(&Data, &ValidationAggregator) -> Shaped<Payload>`.
/// * `pub struct Name: SchemaType = schema_fn;` validates with the schema
///   returned by `schema_fn()`; the payload is the schema's output.
///
/// The generated type implements [`ValueObject`], `Debug`, value equality,
/// [`ToData`] and `From<Name> for Data`.
#[macro_export]
macro_rules! value_object {
    (@define $(#[$meta:meta])* $vis:vis $name:ident, $value:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $name($crate::Frozen<$value>);

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl ::std::cmp::PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl $crate::ToData for $name {
            fn to_data(&self) -> $crate::Data {
                $crate::Data::Instance($crate::Instance::new(::std::clone::Clone::clone(self)))
            }
        }

        impl ::std::convert::From<$name> for $crate::Data {
            fn from(object: $name) -> Self {
                $crate::Data::Instance($crate::Instance::new(object))
            }
        }
    };

    (@members $name:ident, $value:ty) => {
        const NAME: &'static str = stringify!($name);

        fn from_frozen(value: $crate::Frozen<$value>, _: $crate::parser::ParseToken) -> Self {
            $name(value)
        }

        fn frozen(&self) -> &$crate::Frozen<$value> {
            &self.0
        }

        fn parser() -> &'static $crate::Parser<$name> {
            static PARSER: ::std::sync::OnceLock<$crate::Parser<$name>> =
                ::std::sync::OnceLock::new();
            PARSER.get_or_init(|| {
                $crate::Parser::new(<$name as $crate::ValueObject>::shape)
            })
        }
    };

    ($(#[$meta:meta])* $vis:vis struct $name:ident ( $value:ty ) = $parse:expr ;) => {
        $crate::value_object!(@define $(#[$meta])* $vis $name, $value);

        impl $crate::ValueObject for $name {
            type Value = $value;

            fn shape(
                input: &$crate::Data,
                errs: &$crate::ValidationAggregator,
            ) -> $crate::Shaped<$value> {
                ($parse)(input, errs)
            }

            $crate::value_object!(@members $name, $value);
        }
    };

    ($(#[$meta:meta])* $vis:vis struct $name:ident : $schema:ty = $schema_fn:expr ;) => {
        $crate::value_object!(
            @define $(#[$meta])* $vis $name, <$schema as $crate::SchemaLike>::Output
        );

        impl $crate::SchemaBacked for $name {
            type Schema = $schema;

            fn schema() -> &'static $schema {
                static SCHEMA: ::std::sync::OnceLock<$schema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init($schema_fn)
            }
        }

        impl $crate::ValueObject for $name {
            type Value = <$schema as $crate::SchemaLike>::Output;

            fn shape(
                input: &$crate::Data,
                errs: &$crate::ValidationAggregator,
            ) -> $crate::Shaped<Self::Value> {
                $crate::resolve(<$name as $crate::SchemaBacked>::schema(), input, errs)
            }

            $crate::value_object!(@members $name, <$schema as $crate::SchemaLike>::Output);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_clones_share_payload() {
        let a = Frozen::new(String::from("x"));
        let b = a.clone();
        let c = Frozen::new(String::from("x"));

        assert!(Frozen::ptr_eq(&a, &b));
        assert!(!Frozen::ptr_eq(&a, &c));
        assert_eq!(a, c);
    }
}

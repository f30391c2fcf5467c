//! Discriminated unions of schema-backed value objects.
//!
//! A [`Union`] reads a tag field from its input, dispatches to the variant
//! registered under that tag, and re-anchors the variant's errors under the
//! union's own position. The variant set is computed once, and checked once
//! against the tags the variants' schemas declare.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use stillwater::Validation;
use tracing::{debug, error, trace};

use crate::aggregator::ValidationAggregator;
use crate::data::Data;
use crate::error::{AggregatedValidationError, ConfigError};
use crate::path::FieldPath;
use crate::schema::{FieldLiteral, LiteralSchema, SchemaIssues, SchemaLike};
use crate::resolver::issues_at;
use crate::serializer::ToData;
use crate::value_object::SchemaBacked;

/// One variant of a union, producing values of type `U`.
pub struct Variant<U> {
    name: &'static str,
    field_literal: fn(&str) -> FieldLiteral<'static>,
    matches: fn(&Data) -> bool,
    extract: fn(&Data) -> Option<U>,
    parse: fn(&Data, &ValidationAggregator) -> Result<U, AggregatedValidationError>,
}

impl<U: 'static> Variant<U> {
    /// A variant backed by the schema-defined value object `T`.
    pub fn of<T>() -> Self
    where
        T: SchemaBacked,
        U: From<T>,
    {
        Self {
            name: T::NAME,
            field_literal: |field| T::schema().field_literal(field),
            matches: |data| data.downcast_ref::<T>().is_some(),
            extract: |data| data.downcast_ref::<T>().cloned().map(U::from),
            parse: |data, errs| T::from_json_in(data, errs).map(U::from),
        }
    }
}

impl<U> Clone for Variant<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for Variant<U> {}

impl<U> fmt::Debug for Variant<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variant").field(&self.name).finish()
    }
}

/// Variants by tag, built once from the union's variant function.
struct Registry<U> {
    variants: IndexMap<String, Variant<U>>,
    duplicates: Vec<String>,
    domain: Vec<String>,
    tag_schema: LiteralSchema,
}

impl<U> Registry<U> {
    fn build(entries: Vec<(&'static str, Variant<U>)>, tags: Option<&[String]>) -> Self {
        let mut variants = IndexMap::with_capacity(entries.len());
        let mut duplicates = Vec::new();
        for (tag, variant) in entries {
            if variants.insert(tag.to_string(), variant).is_some() {
                duplicates.push(tag.to_string());
            }
        }

        let domain: Vec<String> = match tags {
            Some(tags) => tags.to_vec(),
            None => variants.keys().cloned().collect(),
        };
        let expected = domain
            .iter()
            .map(|tag| format!("'{}'", tag))
            .collect::<Vec<_>>()
            .join(" | ");
        let tag_schema = LiteralSchema::new(domain.iter().map(String::as_str))
            .error(format!("Invalid discriminator value. Expected {}", expected));

        Self {
            variants,
            duplicates,
            domain,
            tag_schema,
        }
    }
}

/// A discriminated union over schema-backed value objects.
///
/// The wire format is flat: the tag lives next to the variant's own fields.
///
/// # Example
///
/// ```rust
/// use valobj::{value_object, ObjectSchema, Schema, Union, ValueObject, Variant};
/// use serde_json::json;
///
/// fn dog_schema() -> ObjectSchema {
///     Schema::object()
///         .field("type", Schema::literal("dog"))
///         .field("woofs", Schema::boolean())
/// }
///
/// fn cat_schema() -> ObjectSchema {
///     Schema::object()
///         .field("type", Schema::literal("cat"))
///         .field("lives", Schema::integer().min(0).max(9))
/// }
///
/// value_object! { pub struct Dog: ObjectSchema = dog_schema; }
/// value_object! { pub struct Cat: ObjectSchema = cat_schema; }
///
/// #[derive(Debug, Clone)]
/// enum Pet {
///     Dog(Dog),
///     Cat(Cat),
/// }
///
/// impl From<Dog> for Pet {
///     fn from(dog: Dog) -> Self { Pet::Dog(dog) }
/// }
///
/// impl From<Cat> for Pet {
///     fn from(cat: Cat) -> Self { Pet::Cat(cat) }
/// }
///
/// static PETS: Union<Pet> = Union::define("type", || {
///     vec![("dog", Variant::of::<Dog>()), ("cat", Variant::of::<Cat>())]
/// });
///
/// let pet = PETS.from_json(json!({"type": "dog", "woofs": true})).unwrap();
/// assert!(matches!(pet, Pet::Dog(_)));
///
/// let error = PETS.from_json(json!({"type": "dog", "woofs": null})).unwrap_err();
/// assert_eq!(error.first().path(), "woofs");
/// ```
pub struct Union<U> {
    discriminator: &'static str,
    variants: fn() -> Vec<(&'static str, Variant<U>)>,
    tags: Option<Vec<String>>,
    registry: OnceLock<Registry<U>>,
    checked: OnceLock<Result<(), ConfigError>>,
}

impl<U> Union<U> {
    /// Defines a union keyed on the field `discriminator`.
    ///
    /// `variants` runs at most once, on first use.
    pub const fn define(
        discriminator: &'static str,
        variants: fn() -> Vec<(&'static str, Variant<U>)>,
    ) -> Self {
        Self {
            discriminator,
            variants,
            tags: None,
            registry: OnceLock::new(),
            checked: OnceLock::new(),
        }
    }

    /// Declares the discriminator's domain explicitly.
    ///
    /// Without it the domain is the set of registered tags. A tag in the
    /// domain with no registered variant is a configuration error.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the name of the discriminator field.
    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Returns the discriminator's domain.
    pub fn tags(&self) -> Vec<String> {
        self.registry().domain.clone()
    }

    fn registry(&self) -> &Registry<U> {
        self.registry
            .get_or_init(|| Registry::build((self.variants)(), self.tags.as_deref()))
    }

    /// Checks the definition once and returns the memoized outcome.
    ///
    /// Every variant's schema must be an object schema whose discriminator
    /// field is a single string literal equal to the variant's tag; no tag
    /// may be registered twice; every tag of the domain needs a variant.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.checked.get_or_init(|| self.verify()).clone()
    }

    fn verify(&self) -> Result<(), ConfigError> {
        let registry = self.registry();
        let field = || self.discriminator.to_string();

        if let Some(tag) = registry.duplicates.first() {
            return Err(ConfigError::DuplicateVariant { tag: tag.clone() });
        }

        for (tag, variant) in &registry.variants {
            let values = match (variant.field_literal)(self.discriminator) {
                FieldLiteral::Values(values) => values,
                FieldLiteral::NotAnObject => {
                    return Err(ConfigError::NotAnObjectSchema {
                        variant: variant.name,
                        field: field(),
                    })
                }
                FieldLiteral::NotALiteral => {
                    return Err(ConfigError::NotALiteral {
                        variant: variant.name,
                        field: field(),
                    })
                }
            };
            let [value] = values else {
                return Err(ConfigError::AmbiguousLiteral {
                    variant: variant.name,
                    field: field(),
                });
            };
            match value.as_str() {
                Some(declared) if declared == tag => {}
                Some(declared) => {
                    return Err(ConfigError::DiscriminatorMismatch {
                        variant: variant.name,
                        expected: tag.clone(),
                        got: declared.to_string(),
                    })
                }
                None => {
                    return Err(ConfigError::NonStringLiteral {
                        variant: variant.name,
                        field: field(),
                    })
                }
            }
        }

        match registry
            .domain
            .iter()
            .find(|tag| !registry.variants.contains_key(*tag))
        {
            Some(tag) => Err(ConfigError::UnknownVariant { tag: tag.clone() }),
            None => Ok(()),
        }
    }

    /// Returns the checked registry, or panics on a configuration error.
    fn checked_registry(&self) -> &Registry<U> {
        if let Err(fault) = self.check() {
            self.fault(&fault);
        }
        self.registry()
    }

    fn fault(&self, fault: &ConfigError) -> ! {
        error!(
            discriminator = self.discriminator,
            error = %fault,
            "invalid union definition"
        );
        panic!("{}", fault)
    }

    /// Returns true if `value` is an instance of the variant registered as `tag`.
    ///
    /// # Panics
    ///
    /// Panics if the union definition is invalid or `tag` is not registered.
    pub fn is_instance(&self, tag: &str, value: &Data) -> bool {
        match self.checked_registry().variants.get(tag) {
            Some(variant) => (variant.matches)(value),
            None => self.fault(&ConfigError::UnknownVariant {
                tag: tag.to_string(),
            }),
        }
    }

    /// Parses a variant instance or the serialized form of one.
    ///
    /// # Panics
    ///
    /// Panics if the union definition is invalid; see [`Union::check`].
    pub fn from_json(&self, data: impl Into<Data>) -> Result<U, AggregatedValidationError> {
        self.from_json_in(&data.into(), &ValidationAggregator::create())
    }

    /// Like [`Union::from_json`], recording errors into `errs` under its path.
    pub fn from_json_in(
        &self,
        data: &Data,
        errs: &ValidationAggregator,
    ) -> Result<U, AggregatedValidationError> {
        let registry = self.checked_registry();

        if let Some(value) = registry.variants.values().find_map(|v| (v.extract)(data)) {
            trace!(discriminator = self.discriminator, "input is already a variant instance");
            return Ok(value);
        }

        let tag = match registry
            .tag_schema
            .validate(data.get(self.discriminator), &FieldPath::root())
        {
            Validation::Success(tag) => tag,
            Validation::Failure(issues) => {
                debug!(
                    discriminator = self.discriminator,
                    path = %errs.path(),
                    "unrecognized discriminator"
                );
                return Err(errs
                    .with_path(self.discriminator)
                    .add_error(issues.first().message.clone()));
            }
        };

        let Some((tag, variant)) = tag
            .as_str()
            .and_then(|tag| registry.variants.get_key_value(tag))
        else {
            self.fault(&ConfigError::UnknownVariant {
                tag: tag.to_json().to_string(),
            })
        };

        debug!(
            discriminator = self.discriminator,
            tag = %tag,
            variant = variant.name,
            path = %errs.path(),
            "dispatching to union variant"
        );

        let local = ValidationAggregator::create();
        (variant.parse)(data, &local).map_err(|failure| {
            failure.iter().fold(failure.clone(), |_, e| {
                errs.with_paths(e.field_path.segments().cloned())
                    .add_error(e.error.clone())
            })
        })
    }
}

impl<U> Union<U>
where
    U: ToData + Send + Sync + 'static,
{
    /// Returns a schema that parses its value with this union.
    ///
    /// Use it to nest the union inside a schema-backed value object, e.g. as
    /// the item schema of an array field.
    pub fn schema(&self) -> UnionSchema<'_, U> {
        UnionSchema { union: self }
    }
}

impl<U> fmt::Debug for Union<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Union")
            .field("discriminator", &self.discriminator)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// A schema that validates its value with a [`Union`].
///
/// Variant errors become schema issues below the schema's own path, so a
/// union used as the third item of `pets` reports `pets.2.woofs`.
pub struct UnionSchema<'a, U> {
    union: &'a Union<U>,
}

impl<U> Clone for UnionSchema<'_, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for UnionSchema<'_, U> {}

impl<U> fmt::Debug for UnionSchema<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnionSchema")
            .field(&self.union.discriminator)
            .finish()
    }
}

impl<U> SchemaLike for UnionSchema<'_, U>
where
    U: ToData + Send + Sync + 'static,
{
    type Output = U;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<U, SchemaIssues> {
        match self.union.from_json_in(value, &ValidationAggregator::create()) {
            Ok(variant) => Validation::Success(variant),
            Err(error) => Validation::Failure(issues_at(path, &error, "union")),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(|variant| variant.to_data())
    }
}

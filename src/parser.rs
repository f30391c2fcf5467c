//! Turning raw input into validated value objects.
//!
//! A [`Parser`] binds a value object type to its shape-parsing function. It
//! short-circuits on input that already is an instance of the type, threads
//! an aggregator through the shape function, and either returns a frozen
//! instance or the aggregated error; there is no partial success.

use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::aggregator::{Shaped, ValidationAggregator};
use crate::data::Data;
use crate::error::AggregatedValidationError;
use crate::value_object::{Frozen, ValueObject};

/// A shape-parsing function: raw input plus aggregator to a payload.
pub type ShapeFn<V> = fn(&Data, &ValidationAggregator) -> Shaped<V>;

/// Proof that a value object is being built by its parser.
///
/// Only this module can create one, so [`ValueObject::from_frozen`] cannot
/// be used to skip validation.
#[doc(hidden)]
#[derive(Debug)]
pub struct ParseToken(());

/// Parses input into instances of `T`.
///
/// Stateless apart from the bound function, so one parser serves every
/// parse call; [`ValueObject::parser`] memoizes it per type.
pub struct Parser<T: ValueObject> {
    shape: ShapeFn<T::Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueObject> Parser<T> {
    pub fn new(shape: ShapeFn<T::Value>) -> Self {
        Self {
            shape,
            _marker: PhantomData,
        }
    }

    fn parse(
        &self,
        data: &Data,
        errs: Option<&ValidationAggregator>,
    ) -> Result<T, AggregatedValidationError> {
        if let Some(existing) = data.downcast_ref::<T>() {
            trace!(value_object = T::NAME, "input is already an instance");
            return Ok(existing.clone());
        }

        let owned;
        let validator = match errs {
            Some(errs) => errs,
            None => {
                owned = ValidationAggregator::create();
                &owned
            }
        };

        trace!(value_object = T::NAME, path = %validator.path(), "parsing");

        // Errors recorded before this call belong to siblings, not to us.
        let recorded_before = validator.len();
        let result = validator.wrap(|| (self.shape)(data, validator));

        let outcome = match result {
            // A propagated child failure may predate errors recorded after it.
            Err(error) => Err(validator.error().unwrap_or(error)),
            Ok(value) => match validator.error() {
                Some(error) if error.len() > recorded_before => Err(error),
                _ => Ok(T::from_frozen(Frozen::new(value), ParseToken(()))),
            },
        };

        if let Err(error) = &outcome {
            debug!(
                value_object = T::NAME,
                path = %validator.path(),
                errors = error.len(),
                "validation failed"
            );
        }
        outcome
    }

    /// Parses an instance, a raw primitive, or a structure whose fields are
    /// raw values or already-parsed instances.
    ///
    /// Any validation failure is returned as `Err`.
    pub fn create(&self, data: impl Into<Data>) -> Result<T, AggregatedValidationError> {
        self.parse(&data.into(), None)
    }

    /// Like [`Parser::create`], collecting errors into a caller-supplied aggregator.
    ///
    /// The errors stay in `errs` after the call so that the caller can keep
    /// validating siblings and inspect `errs.error()` afterwards.
    pub fn create_in(
        &self,
        data: &Data,
        errs: &ValidationAggregator,
    ) -> Result<T, AggregatedValidationError> {
        self.parse(data, Some(errs))
    }

    /// Parses an instance or the fully serialized plain-data form of one.
    pub fn from_json(&self, data: impl Into<Data>) -> Result<T, AggregatedValidationError> {
        self.parse(&data.into(), None)
    }

    /// Like [`Parser::from_json`], collecting errors into a caller-supplied aggregator.
    pub fn from_json_in(
        &self,
        data: &Data,
        errs: &ValidationAggregator,
    ) -> Result<T, AggregatedValidationError> {
        self.parse(data, Some(errs))
    }
}

impl<T: ValueObject> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").field("value_object", &T::NAME).finish()
    }
}

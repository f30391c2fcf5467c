//! Bridging schemas and aggregators.
//!
//! [`resolve`] turns a schema into a shape-parsing step: every schema issue is
//! recorded on the aggregator at the issue's path. [`ValueObjectSchema`] goes
//! the other way and lets a value object's parser act as a field schema.

use std::fmt;
use std::marker::PhantomData;

use stillwater::prelude::*;
use stillwater::Validation;

use crate::aggregator::{Shaped, ValidationAggregator};
use crate::data::Data;
use crate::error::AggregatedValidationError;
use crate::path::FieldPath;
use crate::schema::{SchemaIssue, SchemaIssues, SchemaLike};
use crate::value_object::ValueObject;

/// Validates `data` against `schema` and records every issue on `errs`.
///
/// Issue paths are relative to the value, so each issue is added under
/// `errs.path()` extended by the issue's own path. On failure the branch is
/// aborted with the aggregate.
///
/// # Example
///
/// ```rust
/// use valobj::{resolve, Data, Schema, ValidationAggregator};
/// use serde_json::json;
///
/// let schema = Schema::object().field("woofs", Schema::boolean());
/// let errs = ValidationAggregator::create().with_path("pets").with_path(2usize);
///
/// let result = resolve(&schema, &Data::from(json!({"woofs": null})), &errs);
///
/// assert!(result.is_err());
/// let error = errs.error().unwrap();
/// assert_eq!(error.first().path(), "pets.2.woofs");
/// ```
pub fn resolve<S>(schema: &S, data: &Data, errs: &ValidationAggregator) -> Shaped<S::Output>
where
    S: SchemaLike + ?Sized,
{
    match schema.validate(data, &FieldPath::root()) {
        Validation::Success(value) => Ok(value),
        Validation::Failure(issues) => {
            let record = |issue: &SchemaIssue| {
                errs.with_paths(issue.path.segments().cloned())
                    .add_error(issue.message.clone())
            };
            let mut aggregate = record(issues.first());
            for issue in issues.iter().skip(1) {
                aggregate = record(issue);
            }
            Err(aggregate.into())
        }
    }
}

/// Converts an aggregated error into schema issues anchored at `path`.
pub(crate) fn issues_at(
    path: &FieldPath,
    error: &AggregatedValidationError,
    code: &str,
) -> SchemaIssues {
    let to_issue = |e: &crate::error::ValidationError| {
        SchemaIssue::new(path.join(&e.field_path), e.message()).with_code(code)
    };
    error
        .iter()
        .skip(1)
        .fold(SchemaIssues::single(to_issue(error.first())), |acc, e| {
            acc.combine(SchemaIssues::single(to_issue(e)))
        })
}

/// A schema that parses its value into the value object `T`.
///
/// Instances of `T` pass through unchanged. Raw values are parsed with a
/// fresh aggregator, so the value object's failure never leaks into the
/// caller's aggregator except through the returned issues.
pub struct ValueObjectSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueObject> ValueObjectSchema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: ValueObject> Default for ValueObjectSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ValueObject> Clone for ValueObjectSchema<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: ValueObject> fmt::Debug for ValueObjectSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueObjectSchema").field(&T::NAME).finish()
    }
}

impl<T: ValueObject> SchemaLike for ValueObjectSchema<T> {
    type Output = T;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<T, SchemaIssues> {
        match T::from_json_in(value, &ValidationAggregator::create()) {
            Ok(object) => Validation::Success(object),
            Err(error) => Validation::Failure(issues_at(path, &error, "value_object")),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(ValueObject::into_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_resolve_success_records_nothing() {
        let errs = ValidationAggregator::create();
        let value = resolve(&Schema::string(), &Data::from("x"), &errs).unwrap();
        assert_eq!(value, "x");
        assert!(errs.is_empty());
    }

    #[test]
    fn test_resolve_records_every_issue() {
        let schema = Schema::object()
            .field("name", Schema::string())
            .field("age", Schema::integer());
        let errs = ValidationAggregator::create();

        let result = resolve(&schema, &Data::from(json!({"age": "x"})), &errs);

        assert!(result.is_err());
        let paths: Vec<String> = errs.error().unwrap().iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["name", "age"]);
    }

    #[test]
    fn test_root_issue_lands_at_aggregator_path() {
        let errs = ValidationAggregator::create().with_path("email");
        let _ = resolve(&Schema::string(), &Data::Null, &errs);
        assert_eq!(errs.error().unwrap().first().path(), "email");
    }
}

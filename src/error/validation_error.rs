//! Field-scoped validation errors and their aggregate.
//!
//! This module provides [`ValidationError`] for a single failure at a field
//! path and [`AggregatedValidationError`] for the non-empty, ordered list of
//! every failure found while parsing one structure.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use stillwater::prelude::*;

use super::log::ErrorLog;
use crate::path::FieldPath;

/// A plain error message.
///
/// String inputs to the aggregator are wrapped into this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Message(pub String);

/// The underlying error of a validation failure.
///
/// `Cause` is a cheaply clonable handle to any error type, so that the same
/// failure can be observed from the aggregate, the grouped view and a
/// re-anchored copy without losing the original error value.
#[derive(Clone)]
pub struct Cause(Arc<dyn StdError + Send + Sync>);

impl Cause {
    /// Wraps an arbitrary error.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(Arc::new(error))
    }

    /// Returns the human-readable message of the wrapped error.
    pub fn message(&self) -> String {
        self.0.to_string()
    }

    /// Returns the wrapped error if it is of type `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Self {
        Self::new(Message(message.to_string()))
    }
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Self::new(Message(message))
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Cause {
    fn from(error: Box<dyn StdError + Send + Sync>) -> Self {
        Self(Arc::from(error))
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.0, f)
    }
}

impl StdError for Cause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// A single validation failure at a field path.
///
/// An empty (root) path means the failure is not attributable to a field.
///
/// # Example
///
/// ```rust
/// use valobj::{FieldPath, ValidationError};
///
/// let error = ValidationError::new(
///     FieldPath::from_field("email"),
///     "must contain an @",
/// );
///
/// assert_eq!(error.field_path.to_string(), "email");
/// assert_eq!(error.message(), "must contain an @");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Where in the structure the failure was discovered.
    pub field_path: FieldPath,
    /// The underlying error.
    pub error: Cause,
}

impl ValidationError {
    /// Creates a new validation error at the given path.
    pub fn new(field_path: FieldPath, error: impl Into<Cause>) -> Self {
        Self {
            field_path,
            error: error.into(),
        }
    }

    /// Returns the dot-joined field path, empty for root errors.
    pub fn path(&self) -> String {
        self.field_path.to_string()
    }

    /// Returns true if the error is not attributable to a field.
    pub fn is_root(&self) -> bool {
        self.path().is_empty()
    }

    /// Returns the message of the underlying error.
    pub fn message(&self) -> String {
        self.error.message()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "{}", self.error)
        } else {
            write!(f, "{}: {}", self.field_path, self.error)
        }
    }
}

impl StdError for ValidationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}

/// Errors partitioned into root errors and errors grouped by field path.
///
/// Both parts keep discovery order; a path may hold several errors.
#[derive(Debug, Clone, Default)]
pub struct GroupedErrors {
    pub root: Vec<Cause>,
    pub paths: IndexMap<String, Vec<Cause>>,
}

/// A flattened summary for simple display: the first root message and the
/// first message per field path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    pub root: Option<String>,
    pub paths: IndexMap<String, String>,
}

/// A non-empty, ordered collection of validation errors.
///
/// Every failure discovered while parsing a structure ends up here, not just
/// the first one. The `Display` form lists root complaints first and then
/// one indented `path: message` line per field error.
///
/// # Example
///
/// ```rust
/// use valobj::{AggregatedValidationError, FieldPath, ValidationError};
///
/// let errors = AggregatedValidationError::from_vec(vec![
///     ValidationError::new(FieldPath::root(), "is invalid"),
///     ValidationError::new(FieldPath::from_field("email"), "must contain an @"),
/// ])
/// .unwrap();
///
/// assert_eq!(
///     errors.to_string(),
///     "Validation Error: is invalid\n  email: must contain an @"
/// );
/// ```
#[derive(Clone)]
pub struct AggregatedValidationError {
    log: ErrorLog,
    errors: OnceLock<NonEmptyVec<ValidationError>>,
}

impl AggregatedValidationError {
    /// Creates an aggregate holding a single error.
    pub fn single(error: ValidationError) -> Self {
        Self::from_log(ErrorLog::single(error))
    }

    /// Creates an aggregate from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<ValidationError>) -> Self {
        Self {
            log: ErrorLog::from_non_empty(&errors),
            errors: OnceLock::from(errors),
        }
    }

    /// Creates an aggregate from a list of errors, or `None` if the list is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self::from_non_empty)
    }

    pub(crate) fn from_log(log: ErrorLog) -> Self {
        Self {
            log,
            errors: OnceLock::new(),
        }
    }

    fn list(&self) -> &NonEmptyVec<ValidationError> {
        self.errors.get_or_init(|| self.log.to_non_empty())
    }

    fn into_non_empty(self) -> NonEmptyVec<ValidationError> {
        match self.errors.into_inner() {
            Some(errors) => errors,
            None => self.log.to_non_empty(),
        }
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Always false; the aggregate is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the errors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.list().iter()
    }

    /// Returns the first error discovered.
    pub fn first(&self) -> &ValidationError {
        self.list().head()
    }

    /// Returns all errors recorded at exactly the given dot-joined path.
    pub fn at_path(&self, path: &str) -> Vec<&ValidationError> {
        self.list().iter().filter(|e| e.path() == path).collect()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn error_list(&self) -> &NonEmptyVec<ValidationError> {
        self.list()
    }

    /// Converts this aggregate into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.into_non_empty().into_vec()
    }

    /// Structured view: root errors and errors grouped by path.
    pub fn errors(&self) -> GroupedErrors {
        let mut grouped = GroupedErrors::default();
        for error in self.list().iter() {
            let path = error.path();
            if path.is_empty() {
                grouped.root.push(error.error.clone());
            } else {
                grouped
                    .paths
                    .entry(path)
                    .or_default()
                    .push(error.error.clone());
            }
        }
        grouped
    }

    /// Summary view: first root message and first message per path.
    pub fn info(&self) -> ErrorInfo {
        let GroupedErrors { root, paths } = self.errors();
        ErrorInfo {
            root: root.first().map(Cause::message),
            paths: paths
                .into_iter()
                .filter_map(|(path, causes)| causes.first().map(|c| (path, c.message())))
                .collect(),
        }
    }
}

impl Semigroup for AggregatedValidationError {
    fn combine(self, other: Self) -> Self {
        Self::from_non_empty(self.into_non_empty().combine(other.into_non_empty()))
    }
}

impl Display for AggregatedValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (root, paths): (Vec<_>, Vec<_>) = self.list().iter().partition(|e| e.is_root());

        let root_messages: Vec<String> = root.iter().map(|e| e.message()).collect();
        write!(f, "Validation Error: {}", root_messages.join(", "))?;

        for error in paths {
            write!(f, "\n  {}: {}", error.field_path, error.error)?;
        }
        Ok(())
    }
}

impl fmt::Debug for AggregatedValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AggregatedValidationError")
            .field(self.list())
            .finish()
    }
}

impl StdError for AggregatedValidationError {}

impl IntoIterator for AggregatedValidationError {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregatedValidationError {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// Aggregates cross thread boundaries when parses run on worker threads.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<AggregatedValidationError>();
    assert_sync::<AggregatedValidationError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn at(path: &str, message: &str) -> ValidationError {
        ValidationError::new(FieldPath::parse(path), message)
    }

    fn aggregate(errors: Vec<ValidationError>) -> AggregatedValidationError {
        AggregatedValidationError::from_vec(errors).unwrap()
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(AggregatedValidationError::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_root_only_message() {
        let errors = aggregate(vec![at("", "error 1")]);
        assert_eq!(errors.to_string(), "Validation Error: error 1");
    }

    #[test]
    fn test_root_messages_are_comma_joined() {
        let errors = aggregate(vec![
            at("", "must not be empty"),
            at("", "must contain an @ symbol"),
        ]);
        assert_eq!(
            errors.to_string(),
            "Validation Error: must not be empty, must contain an @ symbol"
        );
    }

    #[test]
    fn test_path_only_message() {
        let errors = aggregate(vec![at("foo", "error 1"), at("bar", "error 2")]);
        assert_eq!(
            errors.to_string(),
            "Validation Error: \n  foo: error 1\n  bar: error 2"
        );
    }

    #[test]
    fn test_grouped_view_keeps_every_error_per_path() {
        let errors = aggregate(vec![
            at("", "is invalid"),
            at("foo.bar", "error 1"),
            at("foo.bar", "error 2"),
        ]);

        let grouped = errors.errors();
        assert_eq!(grouped.root.len(), 1);
        assert_eq!(grouped.paths.len(), 1);
        let messages: Vec<String> = grouped.paths["foo.bar"].iter().map(Cause::message).collect();
        assert_eq!(messages, vec!["error 1", "error 2"]);

        let info = errors.info();
        assert_eq!(info.root.as_deref(), Some("is invalid"));
        assert_eq!(info.paths["foo.bar"], "error 1");
        assert_eq!(
            errors.to_string(),
            "Validation Error: is invalid\n  foo.bar: error 1\n  foo.bar: error 2"
        );
    }

    #[test]
    fn test_info_without_root() {
        let errors = aggregate(vec![at("foo", "error 1")]);
        assert_eq!(errors.info().root, None);
    }

    #[test]
    fn test_combine_preserves_order() {
        let combined = AggregatedValidationError::single(at("a", "1"))
            .combine(AggregatedValidationError::single(at("b", "2")));
        let paths: Vec<String> = combined.iter().map(ValidationError::path).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn test_cause_keeps_original_error() {
        let cause = Cause::new(std::fmt::Error);
        assert!(cause.downcast_ref::<std::fmt::Error>().is_some());
        assert!(cause.downcast_ref::<Message>().is_none());
    }

    #[test]
    fn test_at_path() {
        let errors = aggregate(vec![at("a", "1"), at("a", "2"), at("b", "3")]);
        assert_eq!(errors.at_path("a").len(), 2);
        assert_eq!(errors.at_path("c").len(), 0);
    }
}

//! Path-scoped collection of validation errors.
//!
//! A [`ValidationAggregator`] is threaded through one top-level parse call.
//! Child aggregators created with [`ValidationAggregator::with_path`] share
//! the same error list but record errors under a longer path, so the root
//! aggregator sees every failure discovered anywhere below it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AggregatedValidationError, Cause, ErrorLog, ValidationError};
use crate::path::{FieldPath, PathSegment};

/// Why a shape-parsing function stopped early.
#[derive(Debug, Clone)]
pub enum ShapeError {
    /// The branch was aborted with an aggregated error, either through
    /// [`ValidationAggregator::fail`] or by propagating a child's failure.
    Invalid(AggregatedValidationError),
    /// Any other error; it is recorded at the aggregator's current path.
    Other(Cause),
}

impl ShapeError {
    /// Wraps an arbitrary error so that `wrap` records it as a validation error.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ShapeError::Other(Cause::new(error))
    }
}

impl From<AggregatedValidationError> for ShapeError {
    fn from(error: AggregatedValidationError) -> Self {
        ShapeError::Invalid(error)
    }
}

impl From<Cause> for ShapeError {
    fn from(cause: Cause) -> Self {
        ShapeError::Other(cause)
    }
}

impl From<&str> for ShapeError {
    fn from(message: &str) -> Self {
        ShapeError::Other(message.into())
    }
}

impl From<String> for ShapeError {
    fn from(message: String) -> Self {
        ShapeError::Other(message.into())
    }
}

/// Result type returned by shape-parsing functions.
pub type Shaped<T> = Result<T, ShapeError>;

/// Collects validation errors at a field path.
///
/// Cloning an aggregator or scoping it with `with_path` never copies the
/// error list; every scope of one hierarchy appends to the same list.
/// Recording an error and taking the aggregated view are constant time.
/// Unrelated parse calls must use unrelated aggregators.
///
/// # Example
///
/// ```rust
/// use valobj::ValidationAggregator;
///
/// let errs = ValidationAggregator::create();
/// errs.with_path("addresses").with_path(1usize).with_path("street")
///     .add_error("must not be empty");
///
/// let error = errs.error().unwrap();
/// assert_eq!(error.info().paths["addresses.1.street"], "must not be empty");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationAggregator {
    path: FieldPath,
    errors: Arc<Mutex<Option<ErrorLog>>>,
}

impl ValidationAggregator {
    /// Creates a root aggregator with an empty error list.
    pub fn create() -> Self {
        Self::default()
    }

    /// Returns the path errors are currently recorded under.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Returns an aggregator one segment deeper, sharing the error list.
    pub fn with_path(&self, segment: impl Into<PathSegment>) -> Self {
        Self {
            path: self.path.push(segment),
            errors: Arc::clone(&self.errors),
        }
    }

    /// Returns an aggregator scoped by every segment in order, sharing the error list.
    ///
    /// An empty segment list leaves the path unchanged.
    pub fn with_paths<I>(&self, segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        let suffix: FieldPath = segments.into_iter().collect();
        Self {
            path: self.path.join(&suffix),
            errors: Arc::clone(&self.errors),
        }
    }

    /// Records an error at the current path and returns the aggregated view.
    ///
    /// Collection continues; siblings can still be validated afterwards.
    pub fn add_error(&self, error: impl Into<Cause>) -> AggregatedValidationError {
        let recorded = ValidationError::new(self.path.clone(), error);
        let mut errors = self.errors.lock();
        let log = ErrorLog::append(errors.as_ref(), recorded);
        *errors = Some(log.clone());
        AggregatedValidationError::from_log(log)
    }

    /// Records an error and aborts the current branch.
    ///
    /// The returned value is always `Err`; it must be returned or propagated
    /// with `?` for the abort to take effect.
    pub fn fail<T>(&self, error: impl Into<Cause>) -> Shaped<T> {
        Err(ShapeError::Invalid(self.add_error(error)))
    }

    /// Returns every error collected by this hierarchy, or `None`.
    ///
    /// The view spans the shared list, not just this aggregator's scope.
    pub fn error(&self) -> Option<AggregatedValidationError> {
        self.errors
            .lock()
            .clone()
            .map(AggregatedValidationError::from_log)
    }

    /// Returns `Err` with the aggregated error if anything was collected.
    pub fn throw_aggregate(&self) -> Result<(), AggregatedValidationError> {
        match self.error() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Runs a shape-parsing step and turns an abort back into a value.
    ///
    /// An aggregated error is returned as-is; any other error is recorded at
    /// the current path first and the full aggregate is returned.
    pub fn wrap<T, F>(&self, func: F) -> Result<T, AggregatedValidationError>
    where
        F: FnOnce() -> Shaped<T>,
    {
        match func() {
            Ok(value) => Ok(value),
            Err(ShapeError::Invalid(error)) => Err(error),
            Err(ShapeError::Other(cause)) => Err(self.add_error(cause)),
        }
    }

    /// Settles the results of sibling parses that were all evaluated.
    ///
    /// Returns every value when all siblings succeeded; otherwise aborts with
    /// the aggregate, which already contains each failing sibling's errors.
    pub fn settle<T, I>(&self, results: I) -> Shaped<Vec<T>>
    where
        I: IntoIterator<Item = Result<T, AggregatedValidationError>>,
    {
        let results: Vec<_> = results.into_iter().collect();
        let mut values = Vec::with_capacity(results.len());
        let mut failure = None;
        for result in results {
            match result {
                Ok(value) => values.push(value),
                Err(error) => failure = failure.or(Some(error)),
            }
        }
        match failure {
            None => Ok(values),
            Some(error) => Err(ShapeError::Invalid(self.error().unwrap_or(error))),
        }
    }

    /// Returns true if any error was collected in this hierarchy.
    pub fn has_errors(&self) -> bool {
        self.errors.lock().is_some()
    }

    /// Returns the number of errors collected in this hierarchy.
    pub fn len(&self) -> usize {
        self.errors.lock().as_ref().map_or(0, ErrorLog::len)
    }

    /// Returns true if no error was collected in this hierarchy.
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }
}

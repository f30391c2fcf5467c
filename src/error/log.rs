//! Append-only error log shared by every scope of one aggregator.

use std::fmt;
use std::sync::Arc;

use stillwater::prelude::*;

use super::ValidationError;

struct Entry {
    error: ValidationError,
    prev: Option<Arc<Entry>>,
}

// Unlink iteratively so that dropping a long log cannot overflow the stack.
impl Drop for Entry {
    fn drop(&mut self) {
        let mut prev = self.prev.take();
        while let Some(entry) = prev {
            match Arc::try_unwrap(entry) {
                Ok(mut entry) => prev = entry.prev.take(),
                Err(_) => break,
            }
        }
    }
}

/// A non-empty, immutable snapshot of an append-only error list.
///
/// Appending yields a new log that shares every earlier entry, so recording
/// an error and taking a snapshot are both constant time; the ordered list is
/// only materialized when someone looks at it.
#[derive(Clone)]
pub(crate) struct ErrorLog {
    last: Arc<Entry>,
    len: usize,
}

impl ErrorLog {
    pub(crate) fn single(error: ValidationError) -> Self {
        Self {
            last: Arc::new(Entry { error, prev: None }),
            len: 1,
        }
    }

    /// Appends to `log`, or starts a new log when there is none yet.
    pub(crate) fn append(log: Option<&ErrorLog>, error: ValidationError) -> Self {
        match log {
            None => Self::single(error),
            Some(log) => Self {
                last: Arc::new(Entry {
                    error,
                    prev: Some(Arc::clone(&log.last)),
                }),
                len: log.len + 1,
            },
        }
    }

    pub(crate) fn from_non_empty(errors: &NonEmptyVec<ValidationError>) -> Self {
        errors
            .tail()
            .iter()
            .fold(Self::single(errors.head().clone()), |log, error| {
                Self::append(Some(&log), error.clone())
            })
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Materializes the log in recording order.
    pub(crate) fn to_non_empty(&self) -> NonEmptyVec<ValidationError> {
        let mut tail = Vec::with_capacity(self.len - 1);
        let mut entry = &self.last;
        while let Some(prev) = &entry.prev {
            tail.push(entry.error.clone());
            entry = prev;
        }
        tail.reverse();
        NonEmptyVec::new(entry.error.clone(), tail)
    }
}

impl fmt::Debug for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLog").field("len", &self.len).finish()
    }
}

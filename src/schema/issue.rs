//! Schema validation issues.
//!
//! This module provides [`SchemaIssue`] for a single schema violation and
//! [`SchemaIssues`] for the non-empty list a failed schema check returns.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::data::Data;
use crate::path::FieldPath;

/// A single schema violation with context.
///
/// - **path**: where the violation occurred, relative to the validated value
/// - **message**: human-readable description
/// - **got** / **expected**: optional detail for display
/// - **code**: machine-readable error code
///
/// # Example
///
/// ```rust
/// use valobj::{FieldPath, SchemaIssue};
///
/// let issue = SchemaIssue::new(FieldPath::from_field("woofs"), "expected boolean")
///     .with_code("invalid_type")
///     .with_got("null")
///     .with_expected("boolean");
///
/// assert_eq!(issue.code, "invalid_type");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub path: FieldPath,
    pub message: String,
    pub got: Option<String>,
    pub expected: Option<String>,
    pub code: String,
}

impl SchemaIssue {
    /// Creates a new issue; the code defaults to `validation_error`.
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaIssue {}

/// Builds the `invalid_type` issue every schema reports for a value of the wrong kind.
pub(crate) fn invalid_type(
    path: &FieldPath,
    value: &Data,
    expected: &str,
    message: Option<&String>,
) -> SchemaIssues {
    let message = message
        .cloned()
        .unwrap_or_else(|| format!("expected {}, received {}", expected, value.type_name()));
    SchemaIssues::single(
        SchemaIssue::new(path.clone(), message)
            .with_code("invalid_type")
            .with_got(value.type_name())
            .with_expected(expected),
    )
}

/// A non-empty collection of schema issues.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssues(NonEmptyVec<SchemaIssue>);

impl SchemaIssues {
    pub fn single(issue: SchemaIssue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates a collection from a list, or `None` if the list is empty.
    pub fn from_vec(issues: Vec<SchemaIssue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaIssue> {
        self.0.iter()
    }

    pub fn first(&self) -> &SchemaIssue {
        self.0.head()
    }

    /// Returns all issues with the specified code.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaIssue> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn into_vec(self) -> Vec<SchemaIssue> {
        self.0.into_vec()
    }
}

impl Semigroup for SchemaIssues {
    fn combine(self, other: Self) -> Self {
        SchemaIssues(self.0.combine(other.0))
    }
}

impl Display for SchemaIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaIssues {}

impl IntoIterator for SchemaIssues {
    type Item = SchemaIssue;
    type IntoIter = std::vec::IntoIter<SchemaIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = SchemaIssue::new(FieldPath::from_field("email"), "invalid format")
            .with_expected("email address")
            .with_got("not-an-email");

        let display = issue.to_string();
        assert!(display.contains("email: invalid format"));
        assert!(display.contains("expected: email address"));
        assert!(display.contains("got: not-an-email"));
    }

    #[test]
    fn test_issue_display_root() {
        let issue = SchemaIssue::new(FieldPath::root(), "value is null");
        assert!(issue.to_string().contains("(root): value is null"));
    }

    #[test]
    fn test_combine_and_filter_by_code() {
        let issues = SchemaIssues::single(
            SchemaIssue::new(FieldPath::from_field("a"), "1").with_code("required"),
        )
        .combine(SchemaIssues::single(
            SchemaIssue::new(FieldPath::from_field("b"), "2").with_code("invalid_type"),
        ));

        assert_eq!(issues.len(), 2);
        assert_eq!(issues.with_code("required").len(), 1);
        assert!(SchemaIssues::from_vec(Vec::new()).is_none());
    }
}

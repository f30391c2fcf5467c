//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays whose items all
//! satisfy one item schema. Length issues and every failing item are reported
//! together.

use stillwater::Validation;

use crate::data::Data;
use crate::path::FieldPath;

use super::issue::{invalid_type, SchemaIssue, SchemaIssues};
use super::traits::SchemaLike;

/// A schema for arrays.
///
/// Items are validated through [`SchemaLike::validate_to_data`], so the
/// output keeps the items' data form (for value-object items, the instances).
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::integer().positive()).max_len(3);
///
/// let issues = schema
///     .validate(&Data::from(json!([1, -2, 3, 0])), &FieldPath::root())
///     .into_result()
///     .unwrap_err();
///
/// let paths: Vec<String> = issues.iter().map(|i| i.path.to_string()).collect();
/// assert_eq!(paths, vec!["", "1", "3"]);
/// ```
#[derive(Clone)]
pub struct ArraySchema<S> {
    item_schema: S,
    min_len: Option<usize>,
    max_len: Option<usize>,
    type_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            min_len: None,
            max_len: None,
            type_message: None,
        }
    }

    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = Some(min);
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets the message used when the value is not an array.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    fn length_issues(&self, len: usize, path: &FieldPath) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        if let Some(min) = self.min_len.filter(|min| len < *min) {
            issues.push(
                SchemaIssue::new(path.clone(), format!("must contain at least {} item(s)", min))
                    .with_code("min_items")
                    .with_expected(format!("at least {} items", min))
                    .with_got(format!("{} items", len)),
            );
        }
        if let Some(max) = self.max_len.filter(|max| len > *max) {
            issues.push(
                SchemaIssue::new(path.clone(), format!("must contain at most {} item(s)", max))
                    .with_code("max_items")
                    .with_expected(format!("at most {} items", max))
                    .with_got(format!("{} items", len)),
            );
        }
        issues
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    type Output = Vec<Data>;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<Vec<Data>, SchemaIssues> {
        let Some(items) = value.as_array() else {
            return Validation::Failure(invalid_type(
                path,
                value,
                "array",
                self.type_message.as_ref(),
            ));
        };

        let mut issues = self.length_issues(items.len(), path);
        let mut validated = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match self.item_schema.validate_to_data(item, &path.push_index(index)) {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(e) => issues.extend(e),
            }
        }

        match SchemaIssues::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(validated),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(Data::Array)
    }
}

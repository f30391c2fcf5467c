//! Boolean and literal schemas.
//!
//! [`LiteralSchema`] is what discriminated unions key on: a variant's schema
//! declares its tag as a single-valued literal field.

use stillwater::Validation;

use crate::data::Data;
use crate::path::FieldPath;

use super::issue::{invalid_type, SchemaIssue, SchemaIssues};
use super::traits::SchemaLike;

/// A schema for boolean values.
#[derive(Clone, Default)]
pub struct BooleanSchema {
    type_message: Option<String>,
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message used when the value is not a boolean.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }
}

impl SchemaLike for BooleanSchema {
    type Output = bool;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<bool, SchemaIssues> {
        match value.as_bool() {
            Some(b) => Validation::Success(b),
            None => Validation::Failure(invalid_type(
                path,
                value,
                "boolean",
                self.type_message.as_ref(),
            )),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(Data::Bool)
    }
}

/// A schema accepting only the listed values.
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
///
/// let schema = Schema::literal("dog");
///
/// assert!(schema.validate(&Data::from("dog"), &FieldPath::root()).is_success());
/// assert!(schema.validate(&Data::from("cat"), &FieldPath::root()).is_failure());
/// assert_eq!(schema.literal_values(), Some(&[Data::from("dog")][..]));
/// ```
#[derive(Clone)]
pub struct LiteralSchema {
    values: Vec<Data>,
    message: Option<String>,
}

impl LiteralSchema {
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Data>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    pub fn values(&self) -> &[Data] {
        &self.values
    }

    /// Sets the message used when the value is not one of the literals.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn describe(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_json().to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl SchemaLike for LiteralSchema {
    type Output = Data;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        if self.values.contains(value) {
            return Validation::Success(value.clone());
        }

        let expected = self.describe();
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| format!("invalid literal value, expected {}", expected));
        let got = if value.is_undefined() {
            "undefined".to_string()
        } else {
            value.to_json().to_string()
        };
        Validation::Failure(SchemaIssues::single(
            SchemaIssue::new(path.clone(), message)
                .with_code("invalid_literal")
                .with_expected(expected)
                .with_got(got),
        ))
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path)
    }

    fn literal_values(&self) -> Option<&[Data]> {
        Some(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean() {
        let schema = BooleanSchema::new();
        assert!(schema.validate(&Data::from(false), &FieldPath::root()).is_success());

        let issues = schema
            .validate(&Data::Null, &FieldPath::from_field("woofs"))
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().path.to_string(), "woofs");
        assert_eq!(issues.first().message, "expected boolean, received null");
    }

    #[test]
    fn test_literal_accepts_any_listed_value() {
        let schema = LiteralSchema::new(["dog", "cat"]);
        assert!(schema.validate(&Data::from("cat"), &FieldPath::root()).is_success());

        let issues = schema
            .validate(&Data::from("cow"), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().code, "invalid_literal");
        assert_eq!(
            issues.first().message,
            r#"invalid literal value, expected "dog" | "cat""#
        );
    }

    #[test]
    fn test_literal_missing_value() {
        let issues = LiteralSchema::new([1])
            .validate(&Data::Undefined, &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().got.as_deref(), Some("undefined"));
    }
}

//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length bounds and regex patterns.

use regex::Regex;
use stillwater::Validation;

use crate::data::Data;
use crate::path::FieldPath;

use super::issue::{invalid_type, SchemaIssue, SchemaIssues};
use super::traits::SchemaLike;

#[derive(Clone)]
enum StringRule {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        message: Option<String>,
    },
}

impl StringRule {
    fn message_mut(&mut self) -> &mut Option<String> {
        match self {
            StringRule::MinLength { message, .. }
            | StringRule::MaxLength { message, .. }
            | StringRule::Pattern { message, .. } => message,
        }
    }

    fn check(&self, value: &str, path: &FieldPath) -> Option<SchemaIssue> {
        match self {
            StringRule::MinLength { min, message } => {
                let len = value.chars().count();
                (len < *min).then(|| {
                    let msg = message.clone().unwrap_or_else(|| {
                        format!("must contain at least {} character(s)", min)
                    });
                    SchemaIssue::new(path.clone(), msg)
                        .with_code("min_length")
                        .with_expected(format!("at least {} characters", min))
                        .with_got(format!("{} characters", len))
                })
            }
            StringRule::MaxLength { max, message } => {
                let len = value.chars().count();
                (len > *max).then(|| {
                    let msg = message.clone().unwrap_or_else(|| {
                        format!("must contain at most {} character(s)", max)
                    });
                    SchemaIssue::new(path.clone(), msg)
                        .with_code("max_length")
                        .with_expected(format!("at most {} characters", max))
                        .with_got(format!("{} characters", len))
                })
            }
            StringRule::Pattern { regex, message } => (!regex.is_match(value)).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern '{}'", regex.as_str()));
                SchemaIssue::new(path.clone(), msg)
                    .with_code("pattern")
                    .with_expected(format!("string matching '{}'", regex.as_str()))
                    .with_got(value.to_string())
            }),
        }
    }
}

/// A schema for string values.
///
/// Every rule is checked, so a value that is both too short and fails the
/// pattern reports two issues.
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
///
/// let schema = Schema::string()
///     .min_len(3)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// let issues = schema
///     .validate(&Data::from("AB"), &FieldPath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(issues.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    rules: Vec<StringRule>,
    type_message: Option<String>,
}

impl StringSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.rules.push(StringRule::MinLength { min, message: None });
        self
    }

    /// Requires at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.rules.push(StringRule::MaxLength { max, message: None });
        self
    }

    /// Requires the string to match `pattern`.
    ///
    /// Returns an error if the pattern does not compile.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.rules.push(StringRule::Pattern {
            regex,
            message: None,
        });
        Ok(self)
    }

    /// Sets the message of the most recent rule, or the type error message
    /// when no rule has been added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(rule) => *rule.message_mut() = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }
}

impl SchemaLike for StringSchema {
    type Output = String;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<String, SchemaIssues> {
        let Some(s) = value.as_str() else {
            return Validation::Failure(invalid_type(
                path,
                value,
                "string",
                self.type_message.as_ref(),
            ));
        };

        let issues: Vec<SchemaIssue> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(s, path))
            .collect();

        match SchemaIssues::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(s.to_string()),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(Data::String)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues(schema: &StringSchema, value: impl Into<Data>) -> SchemaIssues {
        schema
            .validate(&value.into(), &FieldPath::root())
            .into_result()
            .unwrap_err()
    }

    #[test]
    fn test_accepts_string() {
        let result = StringSchema::new().validate(&Data::from("hello"), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), "hello");
    }

    #[test]
    fn test_rejects_other_kinds() {
        let schema = StringSchema::new();
        for value in [Data::Null, Data::Undefined, Data::from(1), Data::from(true)] {
            let issues = issues(&schema, value);
            assert_eq!(issues.first().code, "invalid_type");
        }
        assert_eq!(
            issues(&schema, Data::Null).first().message,
            "expected string, received null"
        );
    }

    #[test]
    fn test_length_bounds_count_characters() {
        let schema = StringSchema::new().min_len(3).max_len(5);
        assert!(schema
            .validate(&Data::from("日本語"), &FieldPath::root())
            .is_success());
        assert_eq!(issues(&schema, "🎉🎊").first().code, "min_length");
        assert_eq!(issues(&schema, "abcdef").first().code, "max_length");
    }

    #[test]
    fn test_all_rules_are_reported() {
        let schema = StringSchema::new().min_len(10).pattern(r"^\d+$").unwrap();
        let issues = issues(&schema, "abc");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues.with_code("pattern").len(), 1);
    }

    #[test]
    fn test_custom_messages() {
        let schema = StringSchema::new().error("must be text").min_len(2).error("too short");
        assert_eq!(issues(&schema, 1).first().message, "must be text");
        assert_eq!(issues(&schema, "a").first().message, "too short");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(StringSchema::new().pattern("[unclosed").is_err());
    }

    #[test]
    fn test_issue_path() {
        let path = FieldPath::from_field("user").push_field("name");
        let result = StringSchema::new().min_len(5).validate(&Data::from("ab"), &path);
        let issues = result.into_result().unwrap_err();
        assert_eq!(issues.first().path.to_string(), "user.name");
    }
}

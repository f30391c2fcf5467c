//! Integer schema validation.

use serde_json::Number;
use stillwater::Validation;

use crate::data::Data;
use crate::path::FieldPath;

use super::issue::{invalid_type, SchemaIssue, SchemaIssues};
use super::traits::SchemaLike;

#[derive(Clone)]
enum IntegerRule {
    Min { min: i64, message: Option<String> },
    Max { max: i64, message: Option<String> },
}

impl IntegerRule {
    fn check(&self, value: i64, path: &FieldPath) -> Option<SchemaIssue> {
        match self {
            IntegerRule::Min { min, message } => (value < *min).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be greater than or equal to {}", min));
                SchemaIssue::new(path.clone(), msg)
                    .with_code("min_value")
                    .with_expected(format!(">= {}", min))
                    .with_got(value.to_string())
            }),
            IntegerRule::Max { max, message } => (value > *max).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be less than or equal to {}", max));
                SchemaIssue::new(path.clone(), msg)
                    .with_code("max_value")
                    .with_expected(format!("<= {}", max))
                    .with_got(value.to_string())
            }),
        }
    }
}

enum Integral {
    Value(i64),
    Fractional,
    OutOfRange,
}

// 1.0 counts as an integer; i64::MAX as f64 rounds up to 2^63, hence the open bound.
fn integral(number: &Number) -> Integral {
    if let Some(n) = number.as_i64() {
        return Integral::Value(n);
    }
    if number.is_u64() {
        return Integral::OutOfRange;
    }
    match number.as_f64() {
        Some(f) if f.fract() != 0.0 || !f.is_finite() => Integral::Fractional,
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Integral::Value(f as i64),
        Some(_) => Integral::OutOfRange,
        None => Integral::Fractional,
    }
}

/// A schema for integer values.
///
/// Integral floats such as `1.0` are accepted. Numbers with a fractional part
/// are rejected as `not_integer`, integers outside the `i64` range as
/// `out_of_range`.
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
///
/// let schema = Schema::integer().min(1).max(120);
///
/// assert!(schema.validate(&Data::from(36), &FieldPath::root()).is_success());
/// assert!(schema.validate(&Data::from(0), &FieldPath::root()).is_failure());
/// assert!(schema.validate(&Data::from(1.5), &FieldPath::root()).is_failure());
/// ```
#[derive(Clone, Default)]
pub struct IntegerSchema {
    rules: Vec<IntegerRule>,
    type_message: Option<String>,
}

impl IntegerSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the value to be at least `min` (inclusive).
    pub fn min(mut self, min: i64) -> Self {
        self.rules.push(IntegerRule::Min { min, message: None });
        self
    }

    /// Requires the value to be at most `max` (inclusive).
    pub fn max(mut self, max: i64) -> Self {
        self.rules.push(IntegerRule::Max { max, message: None });
        self
    }

    /// Requires the value to be greater than zero.
    pub fn positive(self) -> Self {
        self.min(1)
    }

    pub fn non_negative(self) -> Self {
        self.min(0)
    }

    /// Sets the message of the most recent rule, or the type error message
    /// when no rule has been added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(IntegerRule::Min { message: m, .. })
            | Some(IntegerRule::Max { message: m, .. }) => *m = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }
}

impl SchemaLike for IntegerSchema {
    type Output = i64;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<i64, SchemaIssues> {
        let Data::Number(number) = value else {
            return Validation::Failure(invalid_type(
                path,
                value,
                "integer",
                self.type_message.as_ref(),
            ));
        };

        let n = match integral(number) {
            Integral::Value(n) => n,
            Integral::Fractional => {
                let message = self
                    .type_message
                    .clone()
                    .unwrap_or_else(|| "expected integer, received float".to_string());
                return Validation::Failure(SchemaIssues::single(
                    SchemaIssue::new(path.clone(), message)
                        .with_code("not_integer")
                        .with_expected("integer")
                        .with_got(number.to_string()),
                ));
            }
            Integral::OutOfRange => {
                let message = self
                    .type_message
                    .clone()
                    .unwrap_or_else(|| format!("integer out of range, received {}", number));
                return Validation::Failure(SchemaIssues::single(
                    SchemaIssue::new(path.clone(), message)
                        .with_code("out_of_range")
                        .with_expected(format!("{}..={}", i64::MIN, i64::MAX))
                        .with_got(number.to_string()),
                ));
            }
        };

        let issues: Vec<SchemaIssue> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(n, path))
            .collect();

        match SchemaIssues::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(n),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(Data::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_code(schema: &IntegerSchema, value: impl Into<Data>) -> String {
        schema
            .validate(&value.into(), &FieldPath::root())
            .into_result()
            .unwrap_err()
            .first()
            .code
            .clone()
    }

    #[test]
    fn test_accepts_integers() {
        let result = IntegerSchema::new().validate(&Data::from(-7), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), -7);
    }

    #[test]
    fn test_type_errors() {
        let schema = IntegerSchema::new();
        assert_eq!(first_code(&schema, "1"), "invalid_type");
        assert_eq!(first_code(&schema, Data::Null), "invalid_type");
        assert_eq!(first_code(&schema, 2.5), "not_integer");
    }

    #[test]
    fn test_integral_floats_are_integers() {
        let result = IntegerSchema::new().validate(&Data::from(1.0), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), 1);

        let result = IntegerSchema::new().validate(&Data::from(-3.0), &FieldPath::root());
        assert_eq!(result.into_result().unwrap(), -3);
    }

    #[test]
    fn test_out_of_range_integers() {
        let schema = IntegerSchema::new();
        assert_eq!(first_code(&schema, u64::MAX), "out_of_range");
        assert_eq!(first_code(&schema, 1e20), "out_of_range");

        let issues = schema
            .validate(&Data::from(u64::MAX), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(
            issues.first().message,
            "integer out of range, received 18446744073709551615"
        );
    }

    #[test]
    fn test_bounds() {
        let schema = IntegerSchema::new().min(1).max(10);
        assert!(schema.validate(&Data::from(1), &FieldPath::root()).is_success());
        assert!(schema.validate(&Data::from(10), &FieldPath::root()).is_success());
        assert_eq!(first_code(&schema, 0), "min_value");
        assert_eq!(first_code(&schema, 11), "max_value");
    }

    #[test]
    fn test_positive_and_non_negative() {
        assert_eq!(first_code(&IntegerSchema::new().positive(), 0), "min_value");
        assert!(IntegerSchema::new()
            .non_negative()
            .validate(&Data::from(0), &FieldPath::root())
            .is_success());
    }

    #[test]
    fn test_custom_message() {
        let schema = IntegerSchema::new().positive().error("age must be positive");
        let issues = schema
            .validate(&Data::from(-1), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().message, "age must be positive");
    }
}

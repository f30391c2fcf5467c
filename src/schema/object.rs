//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating objects with typed
//! fields, optional fields, default values, and additional property handling.

use indexmap::IndexMap;
use stillwater::Validation;

use crate::data::{Data, Props};
use crate::path::FieldPath;

use super::issue::{invalid_type, SchemaIssue, SchemaIssues};
use super::traits::{FieldLiteral, SchemaLike};

struct FieldDef {
    schema: Box<dyn SchemaLike<Output = Data>>,
    required: bool,
    default: Option<Data>,
}

/// How to handle properties not defined in the schema.
enum AdditionalProperties {
    Strip,
    Allow,
    Deny,
    Validate(Box<dyn SchemaLike<Output = Data>>),
}

/// A schema for objects.
///
/// A field counts as missing when it is absent or `Undefined`; `Null` is a
/// present value and goes through the field's schema. Unknown keys are
/// dropped from the output unless configured otherwise. All field issues are
/// accumulated.
///
/// # Example
///
/// ```rust
/// use valobj::{Data, FieldPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("type", Schema::literal("dog"))
///     .field("woofs", Schema::boolean())
///     .optional("name", Schema::string())
///     .additional_properties(false);
///
/// let input = Data::from(json!({"type": "dog", "woofs": true}));
/// let result = schema.validate(&input, &FieldPath::root());
/// assert!(result.is_success());
///
/// let issues = schema
///     .validate(&Data::from(json!({"type": "dog", "woofs": null, "x": 1})), &FieldPath::root())
///     .into_result()
///     .unwrap_err();
/// let paths: Vec<String> = issues.iter().map(|i| i.path.to_string()).collect();
/// assert_eq!(paths, vec!["woofs", "x"]);
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    additional_properties: AdditionalProperties,
    type_message: Option<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            additional_properties: AdditionalProperties::Strip,
            type_message: None,
        }
    }

    fn insert<S>(
        mut self,
        name: impl Into<String>,
        schema: S,
        required: bool,
        default: Option<Data>,
    ) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(SchemaWrapper(schema)),
                required,
                default,
            },
        );
        self
    }

    /// Adds a required field.
    pub fn field<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.insert(name, schema, true, None)
    }

    /// Adds a field that may be missing.
    ///
    /// A missing field stays out of the output; an explicitly `Undefined`
    /// field is kept as `Undefined`.
    pub fn optional<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.insert(name, schema, false, None)
    }

    /// Adds a field that takes `default` when missing.
    pub fn default<S>(self, name: impl Into<String>, schema: S, default: impl Into<Data>) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.insert(name, schema, false, Some(default.into()))
    }

    /// Configures unknown properties: `true` keeps them, `false` rejects them,
    /// and a schema validates and keeps them. By default they are dropped.
    pub fn additional_properties<S>(mut self, setting: S) -> Self
    where
        S: Into<AdditionalPropertiesSetting>,
    {
        self.additional_properties = setting.into().0;
        self
    }

    /// Sets the message used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    fn check_additional(
        &self,
        key: &str,
        value: &Data,
        path: &FieldPath,
        validated: &mut Props,
        issues: &mut Vec<SchemaIssue>,
    ) {
        match &self.additional_properties {
            AdditionalProperties::Strip => {}
            AdditionalProperties::Allow => {
                validated.insert(key.to_string(), value.clone());
            }
            AdditionalProperties::Deny => issues.push(
                SchemaIssue::new(path.push_field(key), format!("unrecognized key '{}'", key))
                    .with_code("unrecognized_key"),
            ),
            AdditionalProperties::Validate(schema) => {
                match schema.validate_to_data(value, &path.push_field(key)) {
                    Validation::Success(v) => {
                        validated.insert(key.to_string(), v);
                    }
                    Validation::Failure(e) => issues.extend(e),
                }
            }
        }
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    type Output = Props;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<Props, SchemaIssues> {
        let Some(obj) = value.as_object() else {
            return Validation::Failure(invalid_type(
                path,
                value,
                "object",
                self.type_message.as_ref(),
            ));
        };

        let mut issues = Vec::new();
        let mut validated = Props::new();

        for (name, def) in &self.fields {
            let field_path = path.push_field(name);
            match obj.get(name) {
                Some(field_value) if !field_value.is_undefined() => {
                    match def.schema.validate_to_data(field_value, &field_path) {
                        Validation::Success(v) => {
                            validated.insert(name.clone(), v);
                        }
                        Validation::Failure(e) => issues.extend(e),
                    }
                }
                present => {
                    if def.required {
                        issues.push(
                            SchemaIssue::new(field_path, "required")
                                .with_code("required")
                                .with_expected("value")
                                .with_got("undefined"),
                        );
                    } else if let Some(default) = &def.default {
                        validated.insert(name.clone(), default.clone());
                    } else if present.is_some() {
                        validated.insert(name.clone(), Data::Undefined);
                    }
                }
            }
        }

        for (key, field_value) in obj {
            if !self.fields.contains_key(key) {
                self.check_additional(key, field_value, path, &mut validated, &mut issues);
            }
        }

        match SchemaIssues::from_vec(issues) {
            Some(issues) => Validation::Failure(issues),
            None => Validation::Success(validated),
        }
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.validate(value, path).map(Data::Object)
    }

    fn field_literal(&self, name: &str) -> FieldLiteral<'_> {
        match self.fields.get(name).and_then(|def| def.schema.literal_values()) {
            Some(values) => FieldLiteral::Values(values),
            None => FieldLiteral::NotALiteral,
        }
    }
}

/// Adapts any schema to produce `Data` output so fields of different
/// schema types can be stored together.
struct SchemaWrapper<S>(S);

impl<S: SchemaLike> SchemaLike for SchemaWrapper<S> {
    type Output = Data;

    fn validate(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.0.validate_to_data(value, path)
    }

    fn validate_to_data(&self, value: &Data, path: &FieldPath) -> Validation<Data, SchemaIssues> {
        self.0.validate_to_data(value, path)
    }

    fn literal_values(&self) -> Option<&[Data]> {
        self.0.literal_values()
    }

    fn field_literal(&self, name: &str) -> FieldLiteral<'_> {
        self.0.field_literal(name)
    }
}

/// The accepted arguments of [`ObjectSchema::additional_properties`].
pub struct AdditionalPropertiesSetting(AdditionalProperties);

impl From<bool> for AdditionalPropertiesSetting {
    fn from(allow: bool) -> Self {
        if allow {
            AdditionalPropertiesSetting(AdditionalProperties::Allow)
        } else {
            AdditionalPropertiesSetting(AdditionalProperties::Deny)
        }
    }
}

impl<S: SchemaLike + 'static> From<S> for AdditionalPropertiesSetting {
    fn from(schema: S) -> Self {
        AdditionalPropertiesSetting(AdditionalProperties::Validate(Box::new(SchemaWrapper(
            schema,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BooleanSchema, IntegerSchema, LiteralSchema, StringSchema};
    use serde_json::json;

    fn paths(issues: &SchemaIssues) -> Vec<String> {
        issues.iter().map(|i| i.path.to_string()).collect()
    }

    #[test]
    fn test_rejects_non_object() {
        let issues = ObjectSchema::new()
            .validate(&Data::from(json!([1])), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().code, "invalid_type");
        assert_eq!(issues.first().got.as_deref(), Some("array"));
    }

    #[test]
    fn test_required_fields_accumulate() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .field("age", IntegerSchema::new());

        let issues = schema
            .validate(&Data::object([("age", Data::Undefined)]), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(paths(&issues), vec!["name", "age"]);
        assert!(issues.iter().all(|i| i.code == "required"));
    }

    #[test]
    fn test_null_is_not_missing() {
        let schema = ObjectSchema::new().optional("woofs", BooleanSchema::new());
        let issues = schema
            .validate(&Data::from(json!({"woofs": null})), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().code, "invalid_type");
    }

    #[test]
    fn test_optional_and_default() {
        let schema = ObjectSchema::new()
            .optional("nickname", StringSchema::new())
            .optional("addresses", StringSchema::new())
            .default("role", StringSchema::new(), "user");

        let props = schema
            .validate(&Data::object([("addresses", Data::Undefined)]), &FieldPath::root())
            .into_result()
            .unwrap();

        assert!(!props.contains_key("nickname"));
        assert!(props["addresses"].is_undefined());
        assert_eq!(props["role"], Data::from("user"));
    }

    #[test]
    fn test_additional_properties() {
        let input = Data::from(json!({"a": "x", "extra": 1}));

        let stripped = ObjectSchema::new().field("a", StringSchema::new());
        let props = stripped.validate(&input, &FieldPath::root()).into_result().unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a"]);

        let allowed = ObjectSchema::new()
            .field("a", StringSchema::new())
            .additional_properties(true);
        let props = allowed.validate(&input, &FieldPath::root()).into_result().unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props["extra"], Data::from(1));

        let denied = ObjectSchema::new()
            .field("a", StringSchema::new())
            .additional_properties(false);
        let issues = denied.validate(&input, &FieldPath::root()).into_result().unwrap_err();
        assert_eq!(issues.first().code, "unrecognized_key");

        let checked = ObjectSchema::new()
            .field("a", StringSchema::new())
            .additional_properties(StringSchema::new());
        let issues = checked.validate(&input, &FieldPath::root()).into_result().unwrap_err();
        assert_eq!(paths(&issues), vec!["extra"]);
    }

    #[test]
    fn test_nested_paths() {
        let schema = ObjectSchema::new().field(
            "owner",
            ObjectSchema::new().field("age", IntegerSchema::new().positive()),
        );
        let issues = schema
            .validate(&Data::from(json!({"owner": {"age": 0}})), &FieldPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(paths(&issues), vec!["owner.age"]);
    }

    #[test]
    fn test_field_literal() {
        let schema = ObjectSchema::new()
            .field("type", LiteralSchema::new(["dog"]))
            .field("woofs", BooleanSchema::new());

        assert_eq!(
            schema.field_literal("type"),
            FieldLiteral::Values(&[Data::from("dog")])
        );
        assert_eq!(schema.field_literal("woofs"), FieldLiteral::NotALiteral);
        assert_eq!(schema.field_literal("missing"), FieldLiteral::NotALiteral);
        assert_eq!(BooleanSchema::new().field_literal("type"), FieldLiteral::NotAnObject);
    }
}

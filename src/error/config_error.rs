//! Configuration faults raised while assembling a union definition.

/// A setup defect in a union definition.
///
/// These are never data problems: a union whose variants disagree with
/// their registry keys is broken for every input, so the error is reported
/// once and does not enter the aggregated validation reporting path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variant's schema declares a different discriminator literal than
    /// the key it is registered under.
    #[error(
        "Discriminator value mismatch for {variant}: expected \"{expected}\", got \"{got}\""
    )]
    DiscriminatorMismatch {
        variant: &'static str,
        expected: String,
        got: String,
    },

    /// A variant's schema is not an object schema.
    #[error("Cannot extract literal value from non-object schema at {field} ({variant})")]
    NotAnObjectSchema { variant: &'static str, field: String },

    /// The discriminator field is missing from a variant's schema or is not a literal.
    #[error("Field \"{field}\" is not a literal in the schema of {variant}")]
    NotALiteral { variant: &'static str, field: String },

    /// The discriminator literal allows more than one value.
    #[error("Literal for field \"{field}\" of {variant} must have exactly one value")]
    AmbiguousLiteral { variant: &'static str, field: String },

    /// The discriminator literal is not a string.
    #[error("Literal value for field \"{field}\" of {variant} must be a string")]
    NonStringLiteral { variant: &'static str, field: String },

    /// Two variants were registered under the same key.
    #[error("Discriminator value \"{tag}\" is registered more than once")]
    DuplicateVariant { tag: String },

    /// A discriminator value has no registered variant.
    #[error("No schema found for discriminator value \"{tag}\"")]
    UnknownVariant { tag: String },
}

//! Integration tests for the aggregated error views.

use stillwater::prelude::*;
use valobj::{AggregatedValidationError, Cause, FieldPath, ValidationAggregator, ValidationError};

#[derive(Debug, thiserror::Error)]
#[error("out of range: {0}")]
struct OutOfRange(i64);

fn collected() -> AggregatedValidationError {
    let errs = ValidationAggregator::create();
    errs.with_path("email").add_error("must contain an @");
    errs.add_error("is incomplete");
    errs.with_path("email").add_error("must not be empty");
    errs.with_path("addresses").with_path(0usize).add_error("city: required");
    errs.add_error("is stale");
    errs.error().unwrap()
}

#[test]
fn test_message_lists_root_first_then_paths() {
    assert_eq!(
        collected().to_string(),
        "Validation Error: is incomplete, is stale\
         \n  email: must contain an @\
         \n  email: must not be empty\
         \n  addresses.0: city: required"
    );
}

#[test]
fn test_grouped_view_keeps_every_error() {
    let grouped = collected().errors();

    let root: Vec<String> = grouped.root.iter().map(Cause::message).collect();
    assert_eq!(root, vec!["is incomplete", "is stale"]);

    let email: Vec<String> = grouped.paths["email"].iter().map(Cause::message).collect();
    assert_eq!(email, vec!["must contain an @", "must not be empty"]);

    let keys: Vec<&String> = grouped.paths.keys().collect();
    assert_eq!(keys, vec!["email", "addresses.0"]);
}

#[test]
fn test_info_view_keeps_first_per_path() {
    let info = collected().info();
    assert_eq!(info.root.as_deref(), Some("is incomplete"));
    assert_eq!(info.paths["email"], "must contain an @");
    assert_eq!(info.paths.len(), 2);
}

#[test]
fn test_at_path_and_discovery_order() {
    let error = collected();
    assert_eq!(error.len(), 5);
    assert_eq!(error.at_path("email").len(), 2);
    assert!(error.at_path("missing").is_empty());

    let messages: Vec<String> = error.iter().map(ValidationError::message).collect();
    assert_eq!(messages[0], "must contain an @");
    assert_eq!(messages[4], "is stale");
}

#[test]
fn test_typed_causes_survive_aggregation() {
    let errs = ValidationAggregator::create().with_path("age");
    errs.add_error(Cause::new(OutOfRange(-3)));

    let error = errs.error().unwrap();
    let cause = &error.first().error;
    assert_eq!(cause.downcast_ref::<OutOfRange>().map(|e| e.0), Some(-3));
    assert_eq!(error.to_string(), "Validation Error: \n  age: out of range: -3");
}

#[test]
fn test_aggregates_combine() {
    let a = AggregatedValidationError::single(ValidationError::new(FieldPath::root(), "a"));
    let b = AggregatedValidationError::single(ValidationError::new(
        FieldPath::from_field("b"),
        "b",
    ));

    let combined = a.combine(b);
    assert_eq!(combined.len(), 2);
    assert_eq!(combined.to_string(), "Validation Error: a\n  b: b");
}

#[test]
fn test_aggregate_is_a_std_error() {
    let error: Box<dyn std::error::Error + Send + Sync> = Box::new(collected());
    assert!(error.to_string().starts_with("Validation Error: "));
}

//! Tests for concurrent first use of memoized parsers, schemas and unions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use serde_json::json;
use valobj::{
    value_object, Data, ObjectSchema, Schema, Union, ValidationAggregator, ValueObject, Variant,
};

static SCHEMA_BUILDS: AtomicUsize = AtomicUsize::new(0);
static VARIANT_BUILDS: AtomicUsize = AtomicUsize::new(0);

fn point_schema() -> ObjectSchema {
    SCHEMA_BUILDS.fetch_add(1, Ordering::SeqCst);
    Schema::object()
        .field("type", Schema::literal("point"))
        .field("x", Schema::integer())
        .field("y", Schema::integer())
}

value_object! {
    pub struct Point: ObjectSchema = point_schema;
}

static SHAPES: Union<Data> = Union::define("type", || {
    VARIANT_BUILDS.fetch_add(1, Ordering::SeqCst);
    vec![("point", Variant::of::<Point>())]
});

const THREADS: usize = 16;

#[test]
fn test_concurrent_first_use_initializes_once() {
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let shape = SHAPES
                    .from_json(json!({"type": "point", "x": i, "y": 0}))
                    .unwrap();
                let point = shape.downcast_ref::<Point>().unwrap();
                assert_eq!(point.value()["x"].as_i64(), Some(i as i64));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(SCHEMA_BUILDS.load(Ordering::SeqCst), 1);
    assert_eq!(VARIANT_BUILDS.load(Ordering::SeqCst), 1);
    assert_eq!(SHAPES.check(), Ok(()));
}

#[test]
fn test_independent_parses_do_not_share_errors() {
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            thread::spawn(move || {
                let input = if i % 2 == 0 {
                    json!({"type": "point", "x": "bad", "y": 0})
                } else {
                    json!({"type": "point", "x": 1, "y": 2})
                };
                Point::create(input).map(|_| ()).map_err(|e| e.len())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(result, Err(1));
        } else {
            assert_eq!(result, Ok(()));
        }
    }
}

#[test]
fn test_shared_aggregator_across_threads() {
    let errs = ValidationAggregator::create();

    thread::scope(|scope| {
        for i in 0..4usize {
            let child = errs.with_path("items").with_path(i);
            scope.spawn(move || {
                let _ = Point::create_in(&Data::from(json!({"type": "point"})), &child);
            });
        }
    });

    // Each child reports the two missing coordinates.
    assert_eq!(errs.len(), 8);
}

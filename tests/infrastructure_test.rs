//! Test to verify test infrastructure works correctly

mod common;

use common::builders::SeriesBuilder;
use seriesdash_rs::ingest::{csv, json};

#[test]
fn test_infrastructure_setup() {
    // Both renderings of a built series decode to the same observations
    let builder = SeriesBuilder::new(common::jan(1)).values(&[1.0, 2.5, -3.0]);
    let expected = builder.build();

    let from_json = json::decode(builder.to_json().as_bytes()).unwrap();
    let from_csv = csv::decode(builder.to_csv().as_bytes()).unwrap();

    assert_eq!(from_json.len(), 3);
    for ((a, b), c) in expected.iter().zip(&from_json).zip(&from_csv) {
        assert!(a.same_observation(b));
        assert!(a.same_observation(c));
    }
}

#[test]
fn test_float_comparison() {
    common::assert_float_eq(1.0, 1.0000001, 0.001);
}

#[test]
#[should_panic]
fn test_float_comparison_fails() {
    common::assert_float_eq(1.0, 2.0, 0.001);
}

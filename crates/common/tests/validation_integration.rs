//! Integration tests for the validation module
//!
//! Exercises the validator the way the domain crate uses it: nested paths,
//! wire-style field names and several failures reported together.

#![cfg(feature = "foundation")]

use lakekeeper_common::validation::{
    FieldValidator, RangeValidator, StringValidator, UrlValidator, Validator,
};

/// Validates that every failing rule of a nested object is reported, with
/// the parent path prefixed to each field.
#[test]
fn test_nested_object_reports_all_failures() {
    let bucket = "ab".to_string();
    let endpoint = "http://minio:9000".to_string();
    let validity: i64 = 0;

    let mut validator = Validator::new();
    validator.validate_nested("storage-profile", |v| {
        v.validate_field("bucket", &bucket, &StringValidator::new().min_length(3).max_length(64));
        v.validate_field("endpoint", &endpoint, &StringValidator::new().ends_with("/"));
        v.validate_field("sts-token-validity-seconds", &validity, &RangeValidator::new(1, 43_200));
    });

    let err = validator.finalize().expect_err("three rules are violated");
    assert_eq!(err.error_count(), 3);
    assert!(err.has_field("storage-profile.bucket"));
    assert!(err.has_field("storage-profile.endpoint"));
    assert!(err.has_field("storage-profile.sts-token-validity-seconds"));
}

#[test]
fn test_clean_object_passes() {
    let mut validator = Validator::new();
    validator.validate_not_empty("warehouse-name", "analytics");
    validator.validate_field(
        "endpoint",
        &"https://s3.eu-west-1.amazonaws.com/".to_string(),
        &UrlValidator::new(),
    );
    assert!(validator.finalize().is_ok());
}

#[test]
fn test_validators_are_reusable_across_fields() {
    let bucket_rule = StringValidator::new().not_empty().min_length(3).max_length(64);
    for candidate in ["abc", "warehouse-bucket", &"x".repeat(64)] {
        assert!(bucket_rule.validate(&candidate).is_ok(), "{candidate}");
    }
    for candidate in ["", "ab", &"x".repeat(65)] {
        assert!(bucket_rule.validate(&candidate).is_err(), "{candidate}");
    }
}

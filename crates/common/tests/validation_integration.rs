//! Integration tests for validation module
//!
//! Exercises the validator the way request parsing uses it: several fields,
//! mixed validators, nested paths.

use hmis_common::validation::{OneOfValidator, UrlValidator, ValidationError, Validator};

/// Test basic field validation
#[test]
fn test_basic_field_validation() {
    let mut validator = Validator::new();

    validator.validate_field("order", "desc", &OneOfValidator::new(["asc", "desc"]));
    validator.validate_field("base_url", "https://his.example.org", &UrlValidator::new());
    validator.validate_min("limit", 20_u64, 1);

    assert!(!validator.has_errors());
    assert!(validator.finalize().is_ok());
}

/// Every failing field is reported, in check order
#[test]
fn test_collects_all_failures() {
    let mut validator = Validator::new();

    validator.add_coded_error("sort_by", "expected string, received number", "invalid_type");
    validator.validate_field("order", "sideways", &OneOfValidator::new(["asc", "desc"]));
    validator.validate_min("limit", 0_u64, 1);

    assert_eq!(validator.error_count(), 3);
    let err: ValidationError = validator.finalize().unwrap_err();
    let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["sort_by", "order", "limit"]);
}

/// Test URL validation
#[test]
fn test_url_validation() {
    let url_validator = UrlValidator::new();

    for url in ["https://example.com", "http://test.org/path", "https://api.service.com:8080/v1"] {
        let mut validator = Validator::new();
        validator.validate_field("base_url", url, &url_validator);
        assert!(!validator.has_errors(), "URL {} should be valid", url);
    }

    for url in ["not-a-url", "ftp://files.example.com", ""] {
        let mut validator = Validator::new();
        validator.validate_field("base_url", url, &url_validator);
        assert!(validator.has_errors(), "URL {} should be invalid", url);
    }
}

/// Nested validation prefixes field names with the parent path
#[test]
fn test_nested_validation() {
    let mut validator = Validator::new();

    validator.validate_nested("api", |api| {
        api.validate_field("base_url", " ", &UrlValidator::new());
        api.validate_min("timeout_secs", 0_u64, 1);
    });

    let err = validator.finalize().unwrap_err();
    assert_eq!(err.field_errors("api.base_url").len(), 1);
    assert_eq!(err.field_errors("api.timeout_secs").len(), 1);
}

/// Validation errors survive a JSON round trip so they can be handed to a UI
#[test]
fn test_validation_error_serializes() {
    let mut err =
        ValidationError::field("id", "must be a non-empty string or non-negative integer");
    err.add_error_with_code("payload", "must be an object", "invalid_type");

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["errors"][0]["field"], "id");
    assert!(json["errors"][0].get("code").is_none());
    assert_eq!(json["errors"][1]["code"], "invalid_type");

    let back: ValidationError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

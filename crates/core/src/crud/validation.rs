//! Argument validation for CRUD operations
//!
//! UI code hands the hook loosely-typed JSON. These rules turn it into the
//! typed arguments [`CrudApi`](crate::CrudApi) expects, or a
//! [`ValidationError`] listing every offending field. Only recognized fields
//! are type-checked; everything else passes through.

use hmis_common::validation::{
    FieldError, FieldValidator, OneOfValidator, ValidationError, ValidationResult, Validator,
};
use hmis_domain::{Fields, ListParams, ResourceId, SortOrder};
use serde_json::Value;

const ID: &str = "id";
const PAYLOAD: &str = "payload";
const PARAMS: &str = "params";

/// Accept a non-empty string or a non-negative integer
///
/// # Errors
/// Empty strings, negative or fractional numbers, booleans, arrays, objects
/// and `null` are rejected.
pub fn parse_id(value: &Value) -> ValidationResult<ResourceId> {
    let (message, code) = match value {
        Value::String(s) if !s.is_empty() => return Ok(ResourceId::Str(s.clone())),
        Value::String(_) => ("must not be empty".to_string(), "too_small"),
        Value::Number(n) => match n.as_u64() {
            Some(n) => return Ok(ResourceId::Int(n)),
            None => ("must be a non-negative integer".to_string(), "invalid_number"),
        },
        other => (format!("expected string or integer, received {}", kind(other)), "invalid_type"),
    };

    Err(rejection(ID, message, code))
}

/// Accept any JSON object, keeping every key
///
/// An omitted payload becomes an empty object.
pub fn parse_payload(value: Option<&Value>) -> ValidationResult<Fields> {
    match value {
        None => Ok(Fields::new()),
        Some(Value::Object(fields)) => Ok(fields.clone()),
        Some(other) => Err(rejection(
            PAYLOAD,
            format!("expected object, received {}", kind(other)),
            "invalid_type",
        )),
    }
}

/// Accept list parameters, type-checking `page`, `limit`, `sort_by` and
/// `order` and passing other keys through
///
/// Every invalid recognized field is reported, not just the first.
pub fn parse_list_params(value: Option<&Value>) -> ValidationResult<ListParams> {
    let fields = match value {
        None => return Ok(ListParams::new()),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(rejection(
                PARAMS,
                format!("expected object, received {}", kind(other)),
                "invalid_type",
            ));
        }
    };

    let mut validator = Validator::new();
    let mut params = ListParams::new();

    for (key, raw) in fields {
        match key.as_str() {
            "page" => params.page = non_negative_integer(&mut validator, key, raw),
            "limit" => params.limit = non_negative_integer(&mut validator, key, raw),
            "sort_by" => match raw {
                Value::String(s) => params.sort_by = Some(s.clone()),
                other => type_error(&mut validator, key, "string", other),
            },
            "order" => params.order = sort_order(&mut validator, key, raw),
            _ => {
                params.extra.insert(key.clone(), raw.clone());
            }
        }
    }

    validator.finish_with(params)
}

fn non_negative_integer(validator: &mut Validator, key: &str, raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => {
            let parsed = n.as_u64();
            if parsed.is_none() {
                validator.add_coded_error(key, "must be a non-negative integer", "invalid_number");
            }
            parsed
        }
        other => {
            type_error(validator, key, "integer", other);
            None
        }
    }
}

fn sort_order(validator: &mut Validator, key: &str, raw: &Value) -> Option<SortOrder> {
    let Value::String(text) = raw else {
        type_error(validator, key, "string", raw);
        return None;
    };

    let allowed = OneOfValidator::new(SortOrder::ALL.iter().map(SortOrder::as_str));
    match allowed.validate(text.as_str()) {
        Ok(()) => text.parse().ok(),
        Err(message) => {
            validator.add_coded_error(key, message, "invalid_enum_value");
            None
        }
    }
}

fn type_error(validator: &mut Validator, key: &str, expected: &str, received: &Value) {
    validator.add_coded_error(
        key,
        format!("expected {expected}, received {}", kind(received)),
        "invalid_type",
    );
}

fn rejection(field: &str, message: String, code: &str) -> ValidationError {
    ValidationError { errors: vec![FieldError::new(field, message).with_code(code)] }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

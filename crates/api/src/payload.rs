//! Payload parsing and validation for create and patch requests.
//!
//! Create and patch bodies arrive as raw JSON objects rather than typed
//! DTOs, for two reasons:
//!
//! - The type checks on `electricity_usage_kwh` and `old_roof` are strict:
//!   a numeric string or a 0/1 surrogate must be rejected with a 400, not
//!   silently coerced or bounced by the deserializer with a generic 422.
//! - Validation order is observable through the returned error (missing
//!   fields before email shape, email shape before uniqueness, uniqueness
//!   before type checks, type checks before nested postal code), so the
//!   stages are separate functions the service composes in order, with the
//!   database-backed uniqueness check in between.
//!
//! Unknown keys are ignored; only the enumerated field names below are ever
//! read. In particular, a client-supplied `id` is never read on patch, so
//! identity cannot be reassigned.

use serde_json::{Map, Value};

use solsage_core::{Email, PostalCode};

use crate::db::addresses::AddressFields;
use crate::error::ValidationError;

const FIRST_NAME: &str = "first_name";
const LAST_NAME: &str = "last_name";
const EMAIL: &str = "email";
const ELECTRICITY_USAGE_KWH: &str = "electricity_usage_kwh";
const OLD_ROOF: &str = "old_roof";
const PROPERTY_ADDRESS: &str = "property_address";
const STREET: &str = "street";
const CITY: &str = "city";
const POSTAL_CODE: &str = "postal_code";
const STATE_CODE: &str = "state_code";

/// A JSON request body: a flat map of field names to values.
pub type Body = Map<String, Value>;

/// Stage 1 of create validation: required fields and email shape.
///
/// # Errors
///
/// - `MissingFields` unless `first_name`, `last_name` and `email` are all
///   present, and the names are non-empty text.
/// - `InvalidEmail` if the email value is not text matching the accepted
///   shape.
pub fn required_fields(body: &Body) -> Result<(String, String, Email), ValidationError> {
    if !body.contains_key(FIRST_NAME) || !body.contains_key(LAST_NAME) || !body.contains_key(EMAIL)
    {
        return Err(ValidationError::MissingFields);
    }

    let first_name = string_field(body, FIRST_NAME)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingFields)?;
    let last_name = string_field(body, LAST_NAME)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ValidationError::MissingFields)?;

    let email = body
        .get(EMAIL)
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidEmail)?;
    let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;

    Ok((first_name, last_name, email))
}

/// Patch email, if one was supplied.
///
/// # Errors
///
/// Returns `InvalidEmail` if the key is present but the value is not text
/// matching the accepted shape.
pub fn patch_email(body: &Body) -> Result<Option<Email>, ValidationError> {
    match body.get(EMAIL) {
        None => Ok(None),
        Some(value) => {
            let email = value.as_str().ok_or(ValidationError::InvalidEmail)?;
            let email = Email::parse(email).map_err(|_| ValidationError::InvalidEmail)?;
            Ok(Some(email))
        }
    }
}

/// Patch name field (`first_name` or `last_name`), if one was supplied.
///
/// Non-text and blank values are ignored rather than rejected: the
/// allow-list of patchable fields only admits non-empty text here, matching
/// what [`required_fields`] enforces on create.
#[must_use]
pub fn patch_name(body: &Body, key: &str) -> Option<String> {
    string_field(body, key).filter(|s| !s.trim().is_empty())
}

/// Strictly typed `electricity_usage_kwh`, if one was supplied.
///
/// # Errors
///
/// Returns `BadUsageType` if the key is present but the value is anything
/// other than a genuine JSON integer - numeric strings, floats, booleans
/// and null all fail.
pub fn electricity_usage(body: &Body) -> Result<Option<i64>, ValidationError> {
    match body.get(ELECTRICITY_USAGE_KWH) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or(ValidationError::BadUsageType),
    }
}

/// Strictly typed `old_roof`, if one was supplied.
///
/// # Errors
///
/// Returns `BadRoofType` if the key is present but the value is anything
/// other than a genuine JSON boolean - 0/1 integers, strings and null all
/// fail.
pub fn old_roof(body: &Body) -> Result<Option<bool>, ValidationError> {
    match body.get(OLD_ROOF) {
        None => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or(ValidationError::BadRoofType),
    }
}

/// The nested `property_address` sub-payload, if one was supplied.
///
/// Only the enumerated address fields are read; `customer_id` and `id` keys
/// in the sub-payload are never honored. A non-object value under the key is
/// treated as absent.
///
/// # Errors
///
/// Returns `InvalidPostalCode` if a `postal_code` key is present but the
/// value is not exactly five digits. This runs before any write, so a bad
/// postal code aborts the whole operation.
pub fn address_fields(body: &Body) -> Result<Option<AddressFields>, ValidationError> {
    let Some(Value::Object(nested)) = body.get(PROPERTY_ADDRESS) else {
        return Ok(None);
    };

    let postal_code = match nested.get(POSTAL_CODE) {
        None => None,
        Some(value) => {
            let raw = value.as_str().ok_or(ValidationError::InvalidPostalCode)?;
            let code =
                PostalCode::parse(raw).map_err(|_| ValidationError::InvalidPostalCode)?;
            Some(code)
        }
    };

    Ok(Some(AddressFields {
        street: string_field(nested, STREET),
        city: string_field(nested, CITY),
        postal_code,
        state_code: string_field(nested, STATE_CODE),
    }))
}

/// A text value under `key`, if present. Non-text values yield `None`.
fn string_field(body: &Body, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_owned)
}

//! Privilege sanitation and validation
//!
//! `sanitize` never fails; `validate` is where malformed input is rejected.
//! Callers validate first and sanitize second.

use privileges_core::error::{PrivilegeError, Result};
use privileges_core::types::{FieldValue, Privilege, RawPrivilege};
use serde_json::Value;

/// True when `value` still has characters after trimming whitespace
pub fn is_non_empty_string(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Fail unless `value` is a non-empty string. Optional fields also accept
/// `None`.
pub fn validate_non_empty_string(field: &str, value: Option<&str>, optional: bool) -> Result<()> {
    match value {
        Some(v) if is_non_empty_string(v) => Ok(()),
        None if optional => Ok(()),
        Some(v) => Err(PrivilegeError::validation(format!(
            "Expected \"{}\" to be a non-empty string, null or undefined. string with value \"{}\" given",
            field, v
        ))),
        None => Err(PrivilegeError::validation(format!(
            "Expected \"{}\" to be a non-empty string. Nothing given",
            field
        ))),
    }
}

/// Normalize a raw privilege into its canonical form.
///
/// The name is copied verbatim (a missing name becomes an empty string, which
/// [`validate`] rejects). Missing optional fields become explicit absent
/// markers.
pub fn sanitize(raw: &RawPrivilege) -> Privilege {
    Privilege {
        name: raw.name.clone().unwrap_or_default(),
        component: FieldValue::from(raw.component.as_deref()),
        group: FieldValue::from(raw.group.as_deref()),
        role: raw.role.clone(),
    }
}

/// Validate a raw privilege
pub fn validate(raw: &RawPrivilege) -> Result<()> {
    validate_non_empty_string("name", raw.name.as_deref(), false)?;
    validate_non_empty_string("component", raw.component.as_deref(), true)?;
    validate_non_empty_string("group", raw.group.as_deref(), true)?;
    validate_non_empty_string("role", raw.role.as_deref(), true)?;
    Ok(())
}

/// Shape-check, then validate, untyped JSON input
pub fn validate_value(value: &Value) -> Result<RawPrivilege> {
    let raw = RawPrivilege::from_value(value)?;
    validate(&raw)?;
    Ok(raw)
}

/// Validate and sanitize in one step
pub fn prepare(raw: &RawPrivilege) -> Result<Privilege> {
    validate(raw)?;
    Ok(sanitize(raw))
}

//! Helpers shared by the payload validators
//!
//! Validators never stop at the first problem: each check records its
//! violation into a `ValidationErrors` and the caller inspects the collection
//! once every field has been looked at.

use std::borrow::Cow;

use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// Records one violation for `field`
pub fn add_violation(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    message: impl Into<String>,
) {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    errors.add(field, error);
}

/// Validates a text field that must not be blank
///
/// Returns the trimmed value when present and non-blank. A missing value is
/// only a violation when `required` is set.
pub fn non_blank(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    required: bool,
) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                add_violation(errors, field, "blank", format!("{} cannot be empty", field));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => {
            if required {
                add_violation(errors, field, "required", format!("{} is required", field));
            }
            None
        }
    }
}

/// Validates a raw JSON field that must be a non-blank string
///
/// Values of any other JSON type are recorded as a violation instead of
/// failing the whole body, so they are reported alongside the rest.
pub fn text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<Value>,
    required: bool,
) -> Option<String> {
    match value {
        None => non_blank(errors, field, None, required),
        Some(Value::String(raw)) => non_blank(errors, field, Some(raw), required),
        Some(_) => {
            add_violation(errors, field, "type", format!("{} must be a string", field));
            None
        }
    }
}

/// Flattens a `ValidationErrors` into `(field, message)` pairs
///
/// Pairs are sorted by field name so responses are stable.
pub fn violation_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                (field.to_string(), message)
            })
        })
        .collect();
    messages.sort();
    messages
}

//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose details
//! carry the field name and a stable code, so clients get a `field:message`
//! pair they can attach to a form.

use serde_json::json;

use crate::domain::{Error, TaskValidationError, UserValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    BlankField,
    TooShort,
    TooLong,
    InvalidFormat,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::BlankField => "blank_field",
            ErrorCode::TooShort => "too_short",
            ErrorCode::TooLong => "too_long",
            ErrorCode::InvalidFormat => "invalid_format",
        }
    }
}

pub(crate) fn field_error(field: &str, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        format!("missing required field: {field}"),
        ErrorCode::MissingField,
    )
}

/// Attach the offending field to a task validation failure.
pub(crate) fn map_task_validation_error(err: TaskValidationError) -> Error {
    let (field, code) = match &err {
        TaskValidationError::EmptyTitle => ("title", ErrorCode::BlankField),
        TaskValidationError::TitleTooLong { .. } => ("title", ErrorCode::TooLong),
        TaskValidationError::DescriptionTooLong { .. } => ("description", ErrorCode::TooLong),
    };
    field_error(field, err.to_string(), code)
}

/// Attach the offending field to a user validation failure.
pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let (field, code) = match &err {
        UserValidationError::EmptyUsername => ("username", ErrorCode::BlankField),
        UserValidationError::UsernameTooShort { .. } => ("username", ErrorCode::TooShort),
        UserValidationError::UsernameTooLong { .. } => ("username", ErrorCode::TooLong),
        UserValidationError::InvalidEmail => ("email", ErrorCode::InvalidFormat),
    };
    field_error(field, err.to_string(), code)
}

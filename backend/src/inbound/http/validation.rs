//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{AccountValidationError, CredentialsValidationError, Error};

/// Build an `invalid_request` error pointing at one payload field.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

/// Map credential parsing failures to field-level errors.
pub(crate) fn credentials_error(error: &CredentialsValidationError) -> Error {
    let code = match error {
        CredentialsValidationError::Email(AccountValidationError::EmptyEmail) => "empty_email",
        CredentialsValidationError::Email(_) => "invalid_email",
        CredentialsValidationError::PasswordTooShort { .. } => "password_too_short",
    };
    let field = match error {
        CredentialsValidationError::Email(_) => "email",
        CredentialsValidationError::PasswordTooShort { .. } => "password",
    };
    field_error(field, code, error.to_string())
}

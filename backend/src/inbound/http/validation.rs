//! Request validation for the users endpoints.
//!
//! Route parameters are validated before the body. Body fields arrive as raw
//! JSON and are checked in order, presence then type then content, so the
//! first violation names its field. Every failure becomes a
//! `VALIDATION_ERROR` whose details name the offending field and a stable
//! snake_case code.

use serde_json::{Value, json};

use crate::domain::{
    EmailAddress, Error, NewUser, UserChanges, UserId, UserName, UserValidationError,
};

/// Validation error codes for HTTP request failures not covered by the
/// domain value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidType,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidType => "invalid_type",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::validation(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_type_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::validation(format!("{field} must be a string")).with_details(json!({
        "field": field,
        "code": ErrorCode::InvalidType.as_str(),
    }))
}

/// Promote a domain validation failure to a `VALIDATION_ERROR`.
pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    Error::validation(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

/// Like [`user_validation_error`] but echoes the rejected raw value.
fn user_validation_error_with_value(err: UserValidationError, value: &str) -> Error {
    Error::validation(err.to_string()).with_details(json!({
        "field": err.field(),
        "value": value,
        "code": err.code(),
    }))
}

/// Coerce the `{id}` route segment into a [`UserId`].
pub(crate) fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::parse(raw).map_err(|err| user_validation_error_with_value(err, raw))
}

pub(crate) fn require(value: Option<Value>, field: FieldName) -> Result<Value, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Accept only JSON strings for a text field.
pub(crate) fn expect_string(value: Value, field: FieldName) -> Result<String, Error> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(invalid_type_error(field)),
    }
}

fn parse_name(value: Value) -> Result<UserName, Error> {
    UserName::new(expect_string(value, NAME)?).map_err(user_validation_error)
}

fn parse_email(value: Value) -> Result<EmailAddress, Error> {
    EmailAddress::new(expect_string(value, EMAIL)?).map_err(user_validation_error)
}

/// Validate a create payload; both fields are required.
pub(crate) fn validate_create(
    name: Option<Value>,
    email: Option<Value>,
) -> Result<NewUser, Error> {
    let name = parse_name(require(name, NAME)?)?;
    let email = parse_email(require(email, EMAIL)?)?;
    Ok(NewUser { name, email })
}

/// Validate a partial update; absent fields are left unchanged but at least
/// one must be supplied.
pub(crate) fn validate_update(
    name: Option<Value>,
    email: Option<Value>,
) -> Result<UserChanges, Error> {
    let name = name.map(parse_name).transpose()?;
    let email = email.map(parse_email).transpose()?;
    UserChanges::new(name, email).map_err(user_validation_error)
}

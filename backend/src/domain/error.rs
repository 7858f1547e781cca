//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps each
//! [`ErrorCode`] onto a status code and renders the payload; the domain only
//! decides which category a failure belongs to.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    ValidationError,
    /// The requested resource does not exist.
    NotFound,
    /// The request collides with a uniqueness constraint.
    DuplicateError,
    /// An unexpected error occurred while serving the request.
    InternalServerError,
}

impl ErrorCode {
    /// Fallback message used when a caller supplies a blank one.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::ValidationError => "invalid input",
            Self::NotFound => "resource not found",
            Self::DuplicateError => "duplicate data",
            Self::InternalServerError => "internal server error",
        }
    }

    /// Wire representation, e.g. `NOT_FOUND`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateError => "DUPLICATE_ERROR",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures raised by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Application error carried from the point of detection to the HTTP
/// boundary.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id` is captured from the ambient [`TraceId`] when one is in scope.
///
/// # Examples
/// ```
/// use users_api::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("user not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "user not found");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

impl Error {
    /// Create a new error.
    ///
    /// A blank message is replaced with the code's default message so the
    /// invariant holds without panicking.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::bare(code, code.default_message()))
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::bare(code, message))
    }

    fn bare(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured when the error was created.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Diagnostic details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use users_api::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation("name is required")
    ///     .with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateError`].
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateError, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalServerError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalServerError, message)
    }

    /// Internal error for failures that did not originate in the store.
    ///
    /// The underlying message is kept as a diagnostic detail only.
    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        Self::internal("unexpected error").with_details(json!({ "reason": detail.to_string() }))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

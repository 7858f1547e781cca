//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! handler the same renderer. Each [`ErrorCode`] maps to one status code and
//! the body is always `{code, message, details?}`. Details, and the real
//! message of internal errors, are only rendered when the request runs with
//! [`DiagnosticMode::Enabled`].

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::middleware::DiagnosticMode;

const REDACTED_INTERNAL_MESSAGE: &str = "internal server error";

/// Error envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "name is required")]
    pub message: String,
    /// Diagnostic details; omitted outside diagnostic mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorBody {
    /// Render `error` for the given diagnostic mode.
    pub fn render(error: &Error, mode: DiagnosticMode) -> Self {
        if mode.is_enabled() {
            return Self {
                code: error.code(),
                message: error.message().to_owned(),
                details: error.details().cloned(),
            };
        }
        let message = match error.code() {
            ErrorCode::InternalServerError => REDACTED_INTERNAL_MESSAGE.to_owned(),
            _ => error.message().to_owned(),
        };
        Self {
            code: error.code(),
            message,
            details: None,
        }
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::DuplicateError => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalServerError) {
            error!(
                message = self.message(),
                details = ?self.details(),
                trace_id = ?self.trace_id(),
                "internal error rendered"
            );
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(ErrorBody::render(self, DiagnosticMode::current()))
    }
}

/// `JsonConfig` error handler for body extraction failures.
///
/// Wrong content type, oversize and unparseable bodies become validation
/// errors; failures reading the payload surface as [`Error::unexpected`].
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::ContentType
        | JsonPayloadError::Deserialize(_)
        | JsonPayloadError::Overflow { .. }
        | JsonPayloadError::OverflowKnownLength { .. } => {
            warn!(error = %err, "rejected request body");
            Error::validation("request body must be a JSON object")
                .with_details(json!({ "field": "body", "code": "invalid_body", "reason": err.to_string() }))
                .into()
        }
        other => {
            error!(error = %other, "failed to read request body");
            Error::unexpected(other).into()
        }
    }
}

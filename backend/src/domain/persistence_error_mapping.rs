//! Translation of store failures into application errors.
//!
//! Every [`UserPersistenceError`] maps to exactly one [`Error`]. Raw store
//! messages only travel as diagnostic details.

use serde_json::json;
use tracing::warn;

use super::Error;
use super::ports::UserPersistenceError;

/// Message returned when a lookup key matches no user.
pub const USER_NOT_FOUND: &str = "user not found";
/// Message returned when an email address is already taken.
pub const EMAIL_ALREADY_REGISTERED: &str = "email already registered";
/// Message returned for uniqueness violations on other columns.
pub const DUPLICATE_DATA: &str = "duplicate data";
/// Message returned for any other store failure.
pub const DATABASE_OPERATION_FAILED: &str = "database operation failed";

/// Map a user store failure onto the application error taxonomy.
///
/// # Examples
/// ```
/// use users_api::domain::ports::UserPersistenceError;
/// use users_api::domain::{ErrorCode, map_user_persistence_error};
///
/// let err = map_user_persistence_error(UserPersistenceError::unique_violation("users_email_key"));
/// assert_eq!(err.code(), ErrorCode::DuplicateError);
/// assert_eq!(err.message(), "email already registered");
/// ```
pub fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::NotFound => Error::not_found(USER_NOT_FOUND),
        UserPersistenceError::UniqueViolation { target } => map_unique_violation(target),
        UserPersistenceError::Connection { message } | UserPersistenceError::Query { message } => {
            Error::internal(DATABASE_OPERATION_FAILED).with_details(json!({ "reason": message }))
        }
    }
}

fn map_unique_violation(target: String) -> Error {
    if targets_email(&target) {
        return Error::duplicate(EMAIL_ALREADY_REGISTERED).with_details(json!({ "target": target }));
    }
    warn!(%target, "unique violation on unexpected target");
    Error::duplicate(DUPLICATE_DATA).with_details(json!({ "target": target }))
}

fn targets_email(target: &str) -> bool {
    target.to_ascii_lowercase().contains("email")
}

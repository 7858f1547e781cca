//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed user values, the application error
//! taxonomy and the store port, free of HTTP and database types.
//!
//! Public surface:
//! - Error / ErrorCode: application error and its stable code.
//! - User, NewUser, UserChanges and their validated field types.
//! - UserService: use-cases over the [`ports::UserRepository`] port.
//! - map_user_persistence_error: store failure translator.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
mod persistence_error_mapping;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::persistence_error_mapping::{
    DATABASE_OPERATION_FAILED, DUPLICATE_DATA, EMAIL_ALREADY_REGISTERED, USER_NOT_FOUND,
    map_user_persistence_error,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, NAME_MAX, NewUser, User, UserChanges, UserId, UserName,
    UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient result alias for domain and adapter code.
///
/// # Examples
/// ```
/// use users_api::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("user not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Port abstraction for the user store and the failures it can signal.
//!
//! Adapters translate their driver-specific errors into
//! [`UserPersistenceError`] so the domain never sees a database type.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserChanges, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// No record exists for the requested key.
        NotFound => "user record not found",
        /// A unique constraint rejected the write; `target` names the
        /// constraint or column reported by the store.
        UniqueViolation { target: String } => "unique constraint violated: {target}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Store operations over persisted users.
///
/// Each method is a single logical store operation. Uniqueness of email
/// addresses is enforced by the store, not checked ahead of the write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every user ordered by identifier.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a user; the store assigns the id and timestamps.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Apply the supplied fields and refresh `updated_at`.
    ///
    /// Returns [`UserPersistenceError::NotFound`] when no user has `id`.
    async fn update(&self, id: UserId, changes: &UserChanges)
    -> Result<User, UserPersistenceError>;

    /// Hard-delete a user and return its last persisted state.
    ///
    /// Returns [`UserPersistenceError::NotFound`] when no user has `id`.
    async fn delete(&self, id: UserId) -> Result<User, UserPersistenceError>;
}

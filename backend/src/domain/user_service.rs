//! User use-cases executed against the store port.
//!
//! Input arrives already validated. Each operation issues a single store
//! call and funnels any failure through [`map_user_persistence_error`].

use std::sync::Arc;

use tracing::debug;

use super::ports::UserRepository;
use super::{Error, NewUser, User, UserChanges, UserId, map_user_persistence_error};
use super::persistence_error_mapping::USER_NOT_FOUND;

/// Application service for the user resource.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a service backed by the given repository.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// List every user in store order.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.repository
            .list()
            .await
            .map_err(map_user_persistence_error)
    }

    /// Fetch a single user, failing with `NOT_FOUND` when absent.
    pub async fn get(&self, id: UserId) -> Result<User, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    /// Create a user.
    pub async fn create(&self, user: NewUser) -> Result<User, Error> {
        let created = self
            .repository
            .create(&user)
            .await
            .map_err(map_user_persistence_error)?;
        debug!(user_id = %created.id(), "user created");
        Ok(created)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, Error> {
        self.repository
            .update(id, &changes)
            .await
            .map_err(map_user_persistence_error)
    }

    /// Delete a user, returning its prior state.
    pub async fn delete(&self, id: UserId) -> Result<User, Error> {
        let deleted = self
            .repository
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        debug!(user_id = %id, "user deleted");
        Ok(deleted)
    }
}

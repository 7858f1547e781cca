//! In-memory adapters for tests.
//!
//! Compiled for unit tests and, through the `test-support` feature, for
//! integration tests and doctests. The repository mirrors the PostgreSQL
//! adapter's observable behaviour: serial ids, ordering by id, a unique
//! email constraint and `RETURNING`-style results.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    StoreHealthError, StoreHealthProbe, UserPersistenceError, UserRepository,
};
use crate::domain::{NewUser, User, UserChanges, UserId};

/// Constraint name reported on email clashes, matching the migration.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    users: Vec<User>,
    failure: Option<UserPersistenceError>,
}

/// Thread-safe user store keeping rows in id order.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: UserPersistenceError) {
        self.lock().failure = Some(error);
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // A poisoned lock only means another test thread panicked.
        self.store
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn guarded(&self) -> Result<MutexGuard<'_, Store>, UserPersistenceError> {
        let store = self.lock();
        if let Some(error) = store.failure.clone() {
            return Err(error);
        }
        Ok(store)
    }
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|user| user.email().as_ref() == email && Some(user.id()) != except)
    }

    fn position(&self, id: UserId) -> Result<usize, UserPersistenceError> {
        self.users
            .iter()
            .position(|user| user.id() == id)
            .ok_or(UserPersistenceError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.guarded()?.users.clone())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let store = self.guarded()?;
        Ok(store.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut store = self.guarded()?;
        if store.email_taken(user.email.as_ref(), None) {
            return Err(UserPersistenceError::unique_violation(
                EMAIL_UNIQUE_CONSTRAINT,
            ));
        }
        let next = store.last_id.saturating_add(1);
        let id = UserId::new(next)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        store.last_id = next;
        let now = Utc::now();
        let created = User::new(id, user.name.clone(), user.email.clone(), now, now);
        store.users.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut store = self.guarded()?;
        let index = store.position(id)?;
        let clashes = changes
            .email()
            .is_some_and(|email| store.email_taken(email.as_ref(), Some(id)));
        if clashes {
            return Err(UserPersistenceError::unique_violation(
                EMAIL_UNIQUE_CONSTRAINT,
            ));
        }
        let current = store
            .users
            .get(index)
            .cloned()
            .ok_or(UserPersistenceError::NotFound)?;
        let updated = User::new(
            id,
            changes.name().cloned().unwrap_or_else(|| current.name().clone()),
            changes
                .email()
                .cloned()
                .unwrap_or_else(|| current.email().clone()),
            current.created_at(),
            Utc::now(),
        );
        if let Some(slot) = store.users.get_mut(index) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<User, UserPersistenceError> {
        let mut store = self.guarded()?;
        let index = store.position(id)?;
        Ok(store.users.remove(index))
    }
}

/// Health probe returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct StubStoreHealthProbe {
    outcome: Result<DateTime<Utc>, StoreHealthError>,
}

impl StubStoreHealthProbe {
    /// Probe that always reports the store as reachable.
    pub fn healthy() -> Self {
        Self {
            outcome: Ok(Utc::now()),
        }
    }

    /// Probe that always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(StoreHealthError::unavailable(message)),
        }
    }
}

#[async_trait]
impl StoreHealthProbe for StubStoreHealthProbe {
    async fn probe(&self) -> Result<DateTime<Utc>, StoreHealthError> {
        self.outcome.clone()
    }
}

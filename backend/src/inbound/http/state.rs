//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::UserService;
use crate::domain::ports::{StoreHealthProbe, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User use-cases backed by the configured repository.
    pub users: UserService,
    /// Connectivity probe reported by `GET /health`.
    pub store_health: Arc<dyn StoreHealthProbe>,
}

impl HttpState {
    /// Wire handlers to the given store adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use users_api::inbound::http::state::HttpState;
    /// use users_api::test_support::{InMemoryUserRepository, StubStoreHealthProbe};
    ///
    /// let state = HttpState::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(StubStoreHealthProbe::healthy()),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(users: Arc<dyn UserRepository>, store_health: Arc<dyn StoreHealthProbe>) -> Self {
        Self {
            users: UserService::new(users),
            store_health,
        }
    }
}

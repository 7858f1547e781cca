//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod store_health;
mod user_repository;

#[cfg(test)]
pub use store_health::MockStoreHealthProbe;
pub use store_health::{StoreHealthError, StoreHealthProbe};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};

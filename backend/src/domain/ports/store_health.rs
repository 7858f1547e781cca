//! Port for probing store connectivity from the health endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::define_port_error;

define_port_error! {
    /// Errors raised when the store cannot answer a probe.
    pub enum StoreHealthError {
        /// The store did not answer the probe.
        Unavailable { message: String } => "store unavailable: {message}",
    }
}

/// Trivial round trip against the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealthProbe: Send + Sync {
    /// Ask the store for its current time.
    async fn probe(&self) -> Result<DateTime<Utc>, StoreHealthError>;
}

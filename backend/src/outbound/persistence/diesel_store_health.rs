//! Connectivity probe for the health endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::sql_types::Timestamptz;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StoreHealthError, StoreHealthProbe};

use super::pool::DbPool;

/// Probes PostgreSQL by asking for the server's current time.
#[derive(Clone)]
pub struct DieselStoreHealthProbe {
    pool: DbPool,
}

impl DieselStoreHealthProbe {
    /// Create a probe over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealthProbe for DieselStoreHealthProbe {
    async fn probe(&self) -> Result<DateTime<Utc>, StoreHealthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| StoreHealthError::unavailable(err.message()))?;

        diesel::select(sql::<Timestamptz>("now()"))
            .get_result::<DateTime<Utc>>(&mut conn)
            .await
            .map_err(|err| {
                debug!(error = %err, "store health probe failed");
                StoreHealthError::unavailable(err.to_string())
            })
    }
}

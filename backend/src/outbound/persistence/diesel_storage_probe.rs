//! Readiness round trip against PostgreSQL.

use async_trait::async_trait;
use diesel_async::SimpleAsyncConnection;

use crate::domain::ports::{ResourceRepositoryError, StorageProbe};

use super::error_mapping::{map_resource_diesel_error, map_resource_pool_error};
use super::pool::DbPool;

/// Checks a connection out and runs `SELECT 1`.
#[derive(Clone)]
pub struct DieselStorageProbe {
    pool: DbPool,
}

impl DieselStorageProbe {
    /// Create a probe backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageProbe for DieselStorageProbe {
    async fn ping(&self) -> Result<(), ResourceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_resource_pool_error)?;
        conn.batch_execute("SELECT 1")
            .await
            .map_err(map_resource_diesel_error)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use appraisal_application::StoreHealth;
use appraisal_core::{AppError, AppResult};

/// Health check that round-trips a trivial query through the pool.
#[derive(Clone)]
pub struct PostgresStoreHealth {
    pool: PgPool,
}

impl PostgresStoreHealth {
    /// Creates a health check with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreHealth for PostgresStoreHealth {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("document store ping failed: {error}")))?;

        Ok(())
    }
}

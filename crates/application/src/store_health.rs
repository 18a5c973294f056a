use async_trait::async_trait;

use appraisal_core::AppResult;

/// Liveness check of the backing document store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeeds when the store answers a trivial query.
    async fn ping(&self) -> AppResult<()>;
}

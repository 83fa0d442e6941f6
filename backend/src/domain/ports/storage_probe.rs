//! Driven port used by the readiness probe.

use async_trait::async_trait;

use super::ResourceRepositoryError;

/// Cheap round trip to the backing store.
#[async_trait]
pub trait StorageProbe: Send + Sync {
    /// Succeeds when storage answers.
    async fn ping(&self) -> Result<(), ResourceRepositoryError>;
}

//! Driven port for orders, adding the guarded status write.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Order, OrderStatus};

use super::{ResourceRepository, ResourceRepositoryError};

/// Order persistence.
#[async_trait]
pub trait OrderRepository: ResourceRepository<Order> {
    /// Set the status to `to` only if it is currently `expected`.
    ///
    /// Returns the refreshed order, or `None` when no row matched, either
    /// because the order is gone or because its status moved on.
    async fn transition_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, ResourceRepositoryError>;
}

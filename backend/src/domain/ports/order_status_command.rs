//! Driving port for order status changes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Order, OrderStatus};

/// Move an order through its status state machine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStatusCommand: Send + Sync {
    /// Apply the transition to `target` and return the refreshed order.
    async fn transition(&self, id: Uuid, target: OrderStatus) -> Result<Order, Error>;
}

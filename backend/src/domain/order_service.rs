//! Order creation with delivery-price snapshots, and status transitions.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    CodeSequence, OrderRepository, OrderStatusCommand, ResourceCommand, ResourceQuery,
    ResourceRepository, ResourceRepositoryError,
};
use crate::domain::product_catalog_service::map_code_sequence_error;
use crate::domain::resource_service::map_repository_error;
use crate::domain::{
    Branch, CodeKind, Error, InvalidTransition, ListRequest, Order, OrderDraft, OrderFields,
    OrderStatus, ResourceService,
};

/// Attempts made before a transition that keeps losing races is reported as
/// a conflict.
pub const MAX_TRANSITION_ATTEMPTS: usize = 3;

fn invalid_transition_error(rejected: InvalidTransition) -> Error {
    Error::invalid_transition(rejected.to_string()).with_details(json!({
        "from": rejected.from,
        "to": rejected.to,
    }))
}

/// Aggregate service for orders.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    branches: ResourceService<Branch>,
    codes: Arc<dyn CodeSequence>,
}

impl OrderService {
    /// Wire the order and branch repositories with the code sequence.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        branches: Arc<dyn ResourceRepository<Branch>>,
        codes: Arc<dyn CodeSequence>,
    ) -> Self {
        Self {
            orders,
            branches: ResourceService::new(branches),
            codes,
        }
    }

    async fn fetch(&self, id: Uuid) -> Result<Order, Error> {
        self.orders
            .get_by_id(id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl ResourceCommand<Order> for OrderService {
    async fn create(&self, input: OrderFields) -> Result<Order, Error> {
        let branch = self.branches.fetch(input.branch_id).await?;
        let code = self
            .codes
            .next_code(CodeKind::Order)
            .await
            .map_err(map_code_sequence_error)?;
        let draft = OrderDraft {
            code,
            delivery_price: branch.fields.delivery_price,
            fields: input,
        };
        let order = self
            .orders
            .create(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(order_id = %order.id, code = %order.order_code, "order created");
        Ok(order)
    }

    async fn update(&self, id: Uuid, changes: OrderFields) -> Result<Order, Error> {
        let affected = self
            .orders
            .update(id, &changes)
            .await
            .map_err(map_repository_error)?;
        if affected == 0 {
            return Err(Error::invalid_request("no rows affected")
                .with_details(json!({ "resource": "order", "id": id })));
        }
        self.fetch(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.orders.delete(id).await.map_err(map_repository_error)
    }
}

#[async_trait]
impl ResourceQuery<Order> for OrderService {
    async fn get(&self, id: Uuid) -> Result<Order, Error> {
        self.fetch(id).await
    }

    async fn list(&self, request: ListRequest) -> Result<Page<Order>, Error> {
        self.orders
            .get_list(&request)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl OrderStatusCommand for OrderService {
    async fn transition(&self, id: Uuid, target: OrderStatus) -> Result<Order, Error> {
        for attempt in 1..=MAX_TRANSITION_ATTEMPTS {
            let current = self.fetch(id).await?;
            current
                .status
                .transition_to(target)
                .map_err(invalid_transition_error)?;
            match self
                .orders
                .transition_status(id, current.status, target)
                .await
            {
                Ok(Some(updated)) => {
                    info!(order_id = %id, from = %current.status, to = %target, "order status changed");
                    return Ok(updated);
                }
                Ok(None) => {
                    warn!(order_id = %id, attempt, expected = %current.status, "order status changed concurrently");
                }
                Err(ResourceRepositoryError::NotFound { .. }) => {
                    warn!(order_id = %id, attempt, "order vanished during transition");
                }
                Err(error) => return Err(map_repository_error(error)),
            }
        }
        Err(Error::conflict("order status changed concurrently; retry the transition")
            .with_details(json!({ "id": id, "to": target })))
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;

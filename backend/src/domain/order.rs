//! Customer orders.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{BusinessCode, Money, OrderStatus, Resource, ResourceKind};

/// Caller-editable order fields, used for both create and overwrite.
///
/// The delivery price, code and status are deliberately absent: they are
/// assigned on create and only the status moves afterwards, through the
/// state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderFields {
    /// Ordering client.
    pub client_id: Uuid,
    /// Fulfilling branch.
    pub branch_id: Uuid,
    /// Delivery address.
    pub address: String,
    /// Number of items.
    pub total_count: i32,
    /// Price of the items.
    pub total_price: Money,
}

/// Create payload after enrichment by the order service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Assigned `O-` code.
    pub code: BusinessCode,
    /// Branch delivery price at creation time.
    pub delivery_price: Money,
    /// Caller fields.
    pub fields: OrderFields,
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    /// Identifier.
    pub id: Uuid,
    /// Business-facing code.
    pub order_code: BusinessCode,
    /// Caller fields.
    #[serde(flatten)]
    pub fields: OrderFields,
    /// Delivery price snapshot.
    pub delivery_price: Money,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Resource for Order {
    type Input = OrderFields;
    type Draft = OrderDraft;
    type Changes = OrderFields;
    type Listing = Self;

    const KIND: ResourceKind = ResourceKind::Order;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

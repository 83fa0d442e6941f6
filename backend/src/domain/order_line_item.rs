//! Product lines attached to an order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Money, Resource, ResourceKind};

/// Caller-editable line fields.
///
/// `sum` is supplied by the caller and stored as given; it is not checked
/// against `quantity * price - discount_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemFields {
    /// Owning order.
    pub order_id: Uuid,
    /// Ordered product.
    pub product_id: Uuid,
    /// Free-text discount tag.
    pub discount_type: String,
    /// Discount applied to the line.
    pub discount_amount: Money,
    /// Number of units.
    pub quantity: i32,
    /// Unit price.
    pub price: Money,
    /// Line total.
    pub sum: Money,
}

/// A stored order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLineItem {
    /// Identifier.
    #[serde(rename = "order_product_id")]
    pub id: Uuid,
    /// Editable fields.
    #[serde(flatten)]
    pub fields: LineItemFields,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Resource for OrderLineItem {
    type Input = LineItemFields;
    type Draft = LineItemFields;
    type Changes = LineItemFields;
    type Listing = Self;

    const KIND: ResourceKind = ResourceKind::OrderLineItem;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

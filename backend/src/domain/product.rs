//! Catalogue products.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{BusinessCode, Category, Money, Resource, ResourceKind};

/// Caller-editable product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFields {
    /// Display title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Photo reference.
    pub photo: String,
    /// Owning category, if any.
    pub category_id: Option<Uuid>,
}

/// Create payload once a product code has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Assigned `P-` code.
    pub code: BusinessCode,
    /// Editable fields.
    pub fields: ProductFields,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Identifier.
    pub id: Uuid,
    /// Business-facing code.
    pub product_code: BusinessCode,
    /// Editable fields.
    #[serde(flatten)]
    pub fields: ProductFields,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A product with its category resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListing {
    /// The stored product.
    #[serde(flatten)]
    pub product: Product,
    /// Embedded category; `None` when unset or since deleted.
    pub category: Option<Category>,
}

impl Resource for Product {
    type Input = ProductFields;
    type Draft = ProductDraft;
    type Changes = ProductFields;
    type Listing = ProductListing;

    const KIND: ResourceKind = ResourceKind::Product;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

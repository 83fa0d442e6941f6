//! Bundle of the driven adapters behind every entity service.

use std::sync::Arc;

use crate::domain::{Branch, Category, Client, OrderLineItem, Product};

use super::{CodeSequence, OrderRepository, ResourceRepository};

/// One storage backend's adapters, handed to the service wiring as a unit.
pub struct Repositories {
    /// Customer records.
    pub clients: Arc<dyn ResourceRepository<Client>>,
    /// Shops and their delivery prices.
    pub branches: Arc<dyn ResourceRepository<Branch>>,
    /// Category tree.
    pub categories: Arc<dyn ResourceRepository<Category>>,
    /// Catalogue items.
    pub products: Arc<dyn ResourceRepository<Product>>,
    /// Orders, including guarded status writes.
    pub orders: Arc<dyn OrderRepository>,
    /// Order lines.
    pub order_products: Arc<dyn ResourceRepository<OrderLineItem>>,
    /// Business code counters.
    pub codes: Arc<dyn CodeSequence>,
}

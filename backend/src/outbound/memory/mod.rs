//! In-process adapters used when no database is configured.
//!
//! Rows live in a mutex-guarded vector per entity kind and vanish with the
//! process. Search, predicates, ordering and foreign keys follow the
//! PostgreSQL adapters so handlers behave the same against either backend.

mod links;
mod records;
mod store;

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::Repositories;
use crate::domain::{Branch, Category, Client, Order, OrderLineItem, Product};

pub use links::{MemoryLinks, OnDelete, Reference};
pub use records::MemoryRecord;
pub use store::{InMemoryCodeSequence, InMemoryResourceRepository, InMemoryStorageProbe};

/// A complete in-memory database: one linked store per entity kind plus
/// process-local code counters.
pub fn repositories(clock: Arc<dyn Clock>) -> Repositories {
    let links = Arc::new(MemoryLinks::default());
    Repositories {
        clients: InMemoryResourceRepository::<Client>::linked(clock.clone(), &links),
        branches: InMemoryResourceRepository::<Branch>::linked(clock.clone(), &links),
        categories: InMemoryResourceRepository::<Category>::linked(clock.clone(), &links),
        products: InMemoryResourceRepository::<Product>::linked(clock.clone(), &links),
        orders: InMemoryResourceRepository::<Order>::linked(clock.clone(), &links),
        order_products: InMemoryResourceRepository::<OrderLineItem>::linked(clock, &links),
        codes: Arc::new(InMemoryCodeSequence::default()),
    }
}

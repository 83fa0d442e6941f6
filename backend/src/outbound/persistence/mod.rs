//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories here only translate between Diesel rows and domain entities;
//! business rules live in the domain services. Connections come from a
//! `bb8` pool of `diesel-async` connections, and every database failure is
//! mapped to a port error before it leaves this module.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use market_backend::outbound::persistence::{DbPool, DieselClientRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/market")).await?;
//! let clients = DieselClientRepository::new(pool);
//! # let _ = clients;
//! # Ok(())
//! # }
//! ```

mod diesel_code_sequence;
mod diesel_resource_repository;
mod diesel_storage_probe;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_code_sequence::DieselCodeSequence;
pub use diesel_resource_repository::{
    DieselBranchRepository, DieselCategoryRepository, DieselClientRepository,
    DieselOrderLineItemRepository, DieselOrderRepository, DieselProductRepository,
};
pub use diesel_storage_probe::DieselStorageProbe;
pub use migrations::{run_pending_migrations, MigrationError, MIGRATIONS};
pub use pool::{DbPool, PoolConfig, PoolError};

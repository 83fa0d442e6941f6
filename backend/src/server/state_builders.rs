//! Builders selecting PostgreSQL or in-memory adapters for the HTTP state.

use std::sync::Arc;

use mockable::Clock;

use market_backend::domain::ports::{Repositories, StorageProbe};
use market_backend::inbound::http::state::HttpState;
use market_backend::outbound::memory::{self, InMemoryStorageProbe};
use market_backend::outbound::persistence::{
    DbPool, DieselBranchRepository, DieselCategoryRepository, DieselClientRepository,
    DieselCodeSequence, DieselOrderLineItemRepository, DieselOrderRepository,
    DieselProductRepository, DieselStorageProbe,
};

use super::{ServerConfig, Storage};

fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories {
        clients: Arc::new(DieselClientRepository::new(pool.clone())),
        branches: Arc::new(DieselBranchRepository::new(pool.clone())),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        products: Arc::new(DieselProductRepository::new(pool.clone())),
        orders: Arc::new(DieselOrderRepository::new(pool.clone())),
        order_products: Arc::new(DieselOrderLineItemRepository::new(pool.clone())),
        codes: Arc::new(DieselCodeSequence::new(pool.clone())),
    }
}

/// Build handler state over the configured storage.
pub(super) fn build_http_state(config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState {
    let repositories = match config.storage() {
        Storage::Postgres(pool) => diesel_repositories(pool),
        Storage::Memory => memory::repositories(clock.clone()),
    };
    HttpState::from_repositories(repositories, clock)
}

/// Pick the readiness probe matching the configured storage.
pub fn build_storage_probe(config: &ServerConfig) -> Arc<dyn StorageProbe> {
    match config.storage() {
        Storage::Postgres(pool) => Arc::new(DieselStorageProbe::new(pool.clone())),
        Storage::Memory => Arc::new(InMemoryStorageProbe),
    }
}

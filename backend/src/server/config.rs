//! HTTP server configuration.

use std::net::SocketAddr;

use market_backend::outbound::persistence::DbPool;

/// Where entity records are kept.
#[derive(Clone, Default)]
pub enum Storage {
    /// Process memory; everything is lost on exit.
    #[default]
    Memory,
    /// PostgreSQL through the shared pool.
    Postgres(DbPool),
}

/// Listener address plus storage selection.
pub struct ServerConfig {
    bind_addr: SocketAddr,
    storage: Storage,
}

impl ServerConfig {
    /// Listen on `bind_addr` with in-memory storage.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            storage: Storage::Memory,
        }
    }

    /// Keep records in PostgreSQL via `pool`.
    #[must_use]
    pub fn with_db_pool(self, pool: DbPool) -> Self {
        Self {
            storage: Storage::Postgres(pool),
            ..self
        }
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Selected storage backend.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

//! Driving ports for entity writes and reads.

use async_trait::async_trait;
use pagination::Page;
use uuid::Uuid;

use crate::domain::{Error, ListRequest, Resource};

/// Create, overwrite and delete records of one kind.
#[async_trait]
pub trait ResourceCommand<R: Resource>: Send + Sync {
    /// Create a record and return it as stored.
    async fn create(&self, input: R::Input) -> Result<R, Error>;

    /// Overwrite a record and return it refreshed. A missing record is an
    /// invalid request.
    async fn update(&self, id: Uuid, changes: R::Changes) -> Result<R, Error>;

    /// Delete a record; deleting a missing record succeeds.
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
}

/// Fetch and list records of one kind.
#[async_trait]
pub trait ResourceQuery<R: Resource>: Send + Sync {
    /// Fetch one record.
    async fn get(&self, id: Uuid) -> Result<R, Error>;

    /// Fetch one page of listings.
    async fn list(&self, request: ListRequest) -> Result<Page<R::Listing>, Error>;
}

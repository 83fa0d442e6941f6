//! Driven port for entity persistence.

use async_trait::async_trait;
use pagination::Page;
use uuid::Uuid;

use crate::domain::{ListRequest, Resource, ResourceKind};

use super::define_port_error;

define_port_error! {
    /// Errors raised by resource repository adapters.
    pub enum ResourceRepositoryError {
        /// Storage could not be reached.
        Connection { message: String } =>
            "resource repository connection failed: {message}",
        /// A query or mutation failed, including check violations and
        /// predicates the entity does not support.
        Query { message: String } =>
            "resource repository query failed: {message}",
        /// A write would leave a reference dangling: the target row is
        /// missing, or a row being deleted is still required by another.
        Reference { message: String } =>
            "resource repository reference check failed: {message}",
        /// No row has the requested identifier.
        NotFound { kind: ResourceKind, id: Uuid } =>
            "{kind} {id} not found",
        /// A stored row cannot be represented in the domain.
        UnsupportedState { message: String } =>
            "stored record is in an unsupported state: {message}",
    }
}

/// CRUD and paginated search for one entity kind.
///
/// Lists are ordered by creation time, newest first, with the identifier as a
/// descending tie-break. `total_count` counts every row matching the filter,
/// ignoring the page window.
#[async_trait]
pub trait ResourceRepository<R: Resource>: Send + Sync {
    /// Insert a new row with a fresh identifier and return it as stored.
    async fn create(&self, draft: &R::Draft) -> Result<R, ResourceRepositoryError>;

    /// Fetch one row; a missing row is [`ResourceRepositoryError::NotFound`].
    async fn get_by_id(&self, id: Uuid) -> Result<R, ResourceRepositoryError>;

    /// Fetch one page of rows matching `request`.
    async fn get_list(&self, request: &ListRequest) -> Result<Page<R>, ResourceRepositoryError>;

    /// Overwrite every editable field; returns the number of rows touched,
    /// which is zero when `id` does not exist.
    async fn update(&self, id: Uuid, changes: &R::Changes) -> Result<u64, ResourceRepositoryError>;

    /// Remove a row. Removing a missing row succeeds.
    async fn delete(&self, id: Uuid) -> Result<(), ResourceRepositoryError>;
}

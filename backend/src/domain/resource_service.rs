//! Generic driving-port service over a [`ResourceRepository`].
//!
//! Entities without extra business rules are served entirely by
//! [`ResourceService`]. Specialised services reuse its helpers and only
//! override the operations they enrich.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::ports::{
    ResourceCommand, ResourceQuery, ResourceRepository, ResourceRepositoryError,
};
use crate::domain::{Error, ListRequest, Resource};

/// Translate a repository failure into a domain error.
pub(crate) fn map_repository_error(error: ResourceRepositoryError) -> Error {
    match error {
        ResourceRepositoryError::NotFound { kind, id } => {
            debug!(%kind, %id, "record not found");
            Error::not_found(format!("{kind} {id} not found")).with_details(json!({
                "resource": kind.label(),
                "id": id,
            }))
        }
        ResourceRepositoryError::Reference { message } => {
            debug!(%message, "write rejected by a reference check");
            Error::invalid_request(message)
        }
        ResourceRepositoryError::Connection { message } => {
            error!(%message, "storage connection failed");
            Error::internal(format!("storage unavailable: {message}"))
        }
        ResourceRepositoryError::Query { message } => {
            error!(%message, "storage query failed");
            Error::internal(format!("storage error: {message}"))
        }
        ResourceRepositoryError::UnsupportedState { message } => {
            error!(%message, "stored record is in an unsupported state");
            Error::internal(format!("unsupported stored state: {message}"))
        }
    }
}

/// CRUD service for one entity kind.
pub struct ResourceService<R: Resource> {
    repository: Arc<dyn ResourceRepository<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    /// Wrap a repository.
    pub fn new(repository: Arc<dyn ResourceRepository<R>>) -> Self {
        Self { repository }
    }

    pub(crate) async fn insert(&self, draft: &R::Draft) -> Result<R, Error> {
        let created = self
            .repository
            .create(draft)
            .await
            .map_err(map_repository_error)?;
        debug!(kind = %R::KIND, id = %created.id(), "record created");
        Ok(created)
    }

    pub(crate) async fn fetch(&self, id: Uuid) -> Result<R, Error> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(map_repository_error)
    }

    pub(crate) async fn fetch_page(&self, request: &ListRequest) -> Result<Page<R>, Error> {
        self.repository
            .get_list(request)
            .await
            .map_err(map_repository_error)
    }

    pub(crate) async fn overwrite(&self, id: Uuid, changes: &R::Changes) -> Result<R, Error> {
        let affected = self
            .repository
            .update(id, changes)
            .await
            .map_err(map_repository_error)?;
        if affected == 0 {
            return Err(Error::invalid_request("no rows affected").with_details(json!({
                "resource": R::KIND.label(),
                "id": id,
            })));
        }
        self.fetch(id).await
    }

    pub(crate) async fn remove(&self, id: Uuid) -> Result<(), Error> {
        self.repository
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        debug!(kind = %R::KIND, %id, "record deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ResourceCommand<R> for ResourceService<R>
where
    R: Resource,
    R::Input: Into<R::Draft>,
{
    async fn create(&self, input: R::Input) -> Result<R, Error> {
        let draft: R::Draft = input.into();
        self.insert(&draft).await
    }

    async fn update(&self, id: Uuid, changes: R::Changes) -> Result<R, Error> {
        self.overwrite(id, &changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.remove(id).await
    }
}

#[async_trait]
impl<R> ResourceQuery<R> for ResourceService<R>
where
    R: Resource<Listing = R>,
{
    async fn get(&self, id: Uuid) -> Result<R, Error> {
        self.fetch(id).await
    }

    async fn list(&self, request: ListRequest) -> Result<Page<R>, Error> {
        self.fetch_page(&request).await
    }
}

#[cfg(test)]
#[path = "resource_service_tests.rs"]
mod tests;

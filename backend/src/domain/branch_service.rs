//! Branch reads with the operating-window availability projection.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ResourceQuery, ResourceRepository};
use crate::domain::{Branch, Error, ListRequest, Predicate, ResourceService, WorkHour};

/// Query service for branches.
///
/// Listing evaluates each branch against the current local `HH:MM`: a branch
/// outside its window is returned with `active = false`. Searching also drops
/// branches that are closed right now. Single fetches return stored values.
#[derive(Clone)]
pub struct BranchService {
    inner: ResourceService<Branch>,
    clock: Arc<dyn Clock>,
}

impl BranchService {
    /// Wrap a branch repository.
    pub fn new(repository: Arc<dyn ResourceRepository<Branch>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: ResourceService::new(repository),
            clock,
        }
    }

    fn now(&self) -> WorkHour {
        WorkHour::from_time(self.clock.local().time())
    }
}

#[async_trait]
impl ResourceQuery<Branch> for BranchService {
    async fn get(&self, id: Uuid) -> Result<Branch, Error> {
        self.inner.fetch(id).await
    }

    async fn list(&self, request: ListRequest) -> Result<Page<Branch>, Error> {
        let now = self.now();
        let request = if request.search().is_some() {
            request.with_predicate(Predicate::OpenAt(now.clone()))
        } else {
            request
        };
        let page = self.inner.fetch_page(&request).await?;
        debug!(at = %now, count = page.len(), "projecting branch availability");
        Ok(page.map(|branch| branch.project_availability(&now)))
    }
}

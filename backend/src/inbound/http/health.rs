//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/live    200 while the process is alive, 503 once draining
//! GET /health/ready   200 once bound and storage answers, 503 otherwise
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use actix_web::{get, http::header, web, HttpResponse};
use tracing::warn;

use crate::domain::ports::StorageProbe;

/// Shared probe state.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    storage: Arc<dyn StorageProbe>,
}

impl HealthState {
    /// Live but not yet ready, checking `storage` on readiness probes.
    pub fn new(storage: Arc<dyn StorageProbe>) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            storage,
        }
    }

    /// Mark the server as bound and able to take traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Whether [`Self::mark_ready`] has been called.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether the process still reports itself alive.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    async fn storage_ok(&self) -> bool {
        match self.storage.ping().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "readiness storage probe failed");
                false
            }
        }
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready() && state.storage_ok().await;
    HealthState::probe_response(ok)
}

/// Liveness probe.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ResourceRepositoryError;
    use crate::outbound::memory::InMemoryStorageProbe;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use rstest::rstest;

    struct DownProbe;

    #[async_trait]
    impl StorageProbe for DownProbe {
        async fn ping(&self) -> Result<(), ResourceRepositoryError> {
            Err(ResourceRepositoryError::connection("refused"))
        }
    }

    async fn probe(state: web::Data<HealthState>, uri: &str) -> StatusCode {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_service(&app, req).await.status()
    }

    #[rstest]
    #[actix_web::test]
    async fn ready_waits_for_bind_and_storage() {
        let up = web::Data::new(HealthState::new(Arc::new(InMemoryStorageProbe)));
        assert_eq!(probe(up.clone(), "/health/ready").await, StatusCode::SERVICE_UNAVAILABLE);
        up.mark_ready();
        assert_eq!(probe(up, "/health/ready").await, StatusCode::OK);

        let down = web::Data::new(HealthState::new(Arc::new(DownProbe)));
        down.mark_ready();
        assert_eq!(probe(down, "/health/ready").await, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn live_fails_once_draining() {
        let state = web::Data::new(HealthState::new(Arc::new(InMemoryStorageProbe)));
        assert_eq!(probe(state.clone(), "/health/live").await, StatusCode::OK);
        state.mark_unhealthy();
        assert_eq!(probe(state, "/health/live").await, StatusCode::SERVICE_UNAVAILABLE);
    }
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::to_bytes;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web, App};
use mockable::Clock;
use serde_json::Value;

use crate::domain::test_fixtures::FixtureClock;
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory;

/// Handler state over fresh in-memory stores, with local time pinned to
/// `hour:minute`.
pub fn memory_state(hour: u32, minute: u32) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(FixtureClock::at(hour, minute));
    HttpState::from_repositories(memory::repositories(clock.clone()), clock)
}

/// Initialise the full route table over `state`.
pub async fn init_app(
    state: HttpState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure),
    )
    .await
}

/// Decode a JSON response body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

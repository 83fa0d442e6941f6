//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, Storage};
pub use state_builders::build_storage_probe;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;

use market_backend::inbound::http::configure;
use market_backend::inbound::http::health::{live, ready, HealthState};
use market_backend::inbound::http::state::HttpState;
use market_backend::Trace;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] carrying the bind address and the
///   optional database pool.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config, Arc::new(DefaultClock)));

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Tests for server bootstrap and readiness signalling.

    use super::*;
    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use market_backend::outbound::memory::InMemoryStorageProbe;
    use rstest::{fixture, rstest};

    #[fixture]
    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new(Arc::new(InMemoryStorageProbe)))
    }

    #[fixture]
    fn config() -> ServerConfig {
        ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    #[rstest]
    #[actix_rt::test]
    async fn create_server_marks_ready(health_state: web::Data<HealthState>, config: ServerConfig) {
        assert!(!health_state.is_ready(), "state should start unready");

        let _server = create_server(health_state.clone(), config).expect("server should build");

        assert!(
            health_state.is_ready(),
            "server creation should mark readiness"
        );
    }

    #[rstest]
    #[actix_rt::test]
    async fn app_serves_probes_and_resources(
        health_state: web::Data<HealthState>,
        config: ServerConfig,
    ) {
        health_state.mark_ready();
        let http_state = web::Data::new(build_http_state(&config, Arc::new(DefaultClock)));
        let app = test::init_service(build_app(health_state, http_state)).await;

        let probe = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(probe.status(), StatusCode::OK);

        let listed =
            test::call_service(&app, test::TestRequest::get().uri("/product").to_request()).await;
        assert_eq!(listed.status(), StatusCode::OK);
        assert!(listed.headers().contains_key("trace-id"));
    }
}

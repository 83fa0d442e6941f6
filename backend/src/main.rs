//! Backend entry-point: loads settings, prepares storage and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{eyre, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use market_backend::inbound::http::health::HealthState;
use market_backend::outbound::persistence::{run_pending_migrations, DbPool, PoolConfig};
use market_backend::MarketSettings;
use server::{build_storage_probe, create_server, ServerConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

async fn migrate(database_url: String) -> Result<()> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| eyre!("migration task failed: {err}"))??;
    info!(applied, "schema up to date");
    Ok(())
}

async fn connect(settings: &MarketSettings, pool_config: PoolConfig) -> Result<DbPool> {
    if settings.skip_migrations {
        info!("skipping schema migrations");
    } else {
        migrate(pool_config.database_url().to_owned()).await?;
    }
    DbPool::new(pool_config)
        .await
        .map_err(|err| eyre!("create database pool: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = MarketSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(bind_addr);
    match settings.pool_config() {
        Some(pool_config) => {
            config = config.with_db_pool(connect(&settings, pool_config).await?);
        }
        None => warn!("no database configured; records are kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new(build_storage_probe(&config)));
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "market backend listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome?;
    Ok(())
}

//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bloodlink::composition::Backend;
use bloodlink::inbound::http::health::HealthState;
use bloodlink::inbound::http::session_config::{BuildMode, session_settings_from_env};
use bloodlink::outbound::memory::InMemoryStore;
use bloodlink::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use bloodlink::settings::ServerSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|error| eyre!("failed to load server settings: {error}"))?;
    let bind_addr = settings.bind_addr()?;
    let origins = settings.origin_policy()?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let backend = match settings.pool_config() {
        Some(pool_config) => connect(pool_config).await?,
        None => {
            warn!("no database configured; data will not survive a restart");
            Backend::InMemory(Arc::new(InMemoryStore::new()))
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, bind_addr, backend).with_origins(origins);
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    info!("server stopped");
    result.wrap_err("server terminated with an error")
}

async fn connect(pool_config: PoolConfig) -> color_eyre::Result<Backend> {
    run_migrations(pool_config.database_url())
        .await
        .wrap_err("failed to migrate the database")?;
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create the database pool")?;
    Ok(Backend::Postgres(pool))
}

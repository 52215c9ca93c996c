//! Backend entry-point: loads settings, prepares storage and serves the API.

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lister::inbound::http::health::HealthState;
use lister::inbound::http::session_config::{BuildMode, session_settings_from_env};
use lister::outbound::persistence::{DbPool, PoolConfig, run_migrations_blocking};
use lister::server::{ServerConfig, Storage, create_server};
use lister::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr);

    if let Some(url) = settings.database_url() {
        if settings.run_migrations {
            let applied = run_migrations_blocking(url.to_owned())
                .await
                .map_err(std::io::Error::other)?;
            info!(applied = applied.len(), "schema up to date");
        }
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_storage(Storage::Postgres(pool));
    }

    info!(addr = %config.bind_addr(), storage = config.storage().label(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

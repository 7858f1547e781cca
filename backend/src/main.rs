//! Users API entry-point: loads settings, migrates the schema and serves HTTP.

use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use users_api::config::AppSettings;
use users_api::outbound::persistence::{DbPool, run_pending_migrations};
use users_api::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let run_mode = settings.run_mode()?;
    let bind_addr = settings.bind_addr()?;
    let pool_config = settings.pool_config()?;

    if settings.skip_migrations {
        warn!("skipping database migrations");
    } else {
        run_pending_migrations(pool_config.database_url())
            .await
            .wrap_err("failed to apply database migrations")?;
    }

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;

    info!(%run_mode, "starting users api");
    let config = ServerConfig::new(bind_addr, pool).with_diagnostics(run_mode.diagnostic_mode());
    create_server(config)
        .wrap_err("failed to start HTTP server")?
        .await
        .wrap_err("HTTP server terminated with an error")
}

//! Backend entry-point: loads settings, prepares storage, replays unfinished
//! customer deletions and serves the admin API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_key::{BuildMode, load_session_key};
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::settings::AdminSettings;
use server::{ServerConfig, build_services, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AdminSettings::load().wrap_err("failed to load settings")?;
    let key = load_session_key(
        &settings.session_key_file(),
        BuildMode::from_debug_assertions(),
        settings.session_allow_ephemeral,
    )?;

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr()?,
    )
    .with_blob_api(settings.blob_api()?)
    .with_cascade_policy(settings.cascade_policy()?);

    if let Some(database_url) = settings.database_url() {
        let applied = run_pending_migrations(database_url).await?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let services = build_services(&config)?;
    match services.cascade.resume_unfinished().await {
        Ok(0) => {}
        Ok(resumed) => info!(resumed, "replayed unfinished customer deletions"),
        Err(err) => warn!(error = %err, "could not replay unfinished customer deletions"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), services.http_state, config)?;
    health_state.mark_ready();
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

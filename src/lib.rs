pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use anyhow::Context;

use crate::core::{config::Settings, redis::RedisHandle, state::AppState, telemetry};

/// Loads configuration, prepares storage and serves the HTTP API until a shutdown signal.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("loading configuration")?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let db = db::init_pool(&settings).await.context("connecting to PostgreSQL")?;
    db::run_migrations(&db).await.context("applying migrations")?;
    let redis = connect_redis(&settings).await;

    let state = AppState::new(settings, db, redis.clone());
    if let Err(err) = core::bootstrap::ensure_first_admin(&state).await {
        tracing::error!(error = %err, "Failed to ensure first admin");
    }

    let served = serve(state).await;
    redis.disconnect().await;
    tracing::info!("Shutdown complete");
    served
}

/// Redis only backs login throttling, so an unreachable server is logged and tolerated.
async fn connect_redis(settings: &Settings) -> RedisHandle {
    let redis = RedisHandle::new(settings.redis().url.clone());
    match redis.connect().await {
        Ok(()) => tracing::info!("Redis connected"),
        Err(err) => tracing::error!(
            error = %err,
            "Failed to connect to Redis; login rate limiting disabled"
        ),
    }
    redis
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let server = state.settings().server().clone();
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr())
        .await
        .with_context(|| format!("binding {}:{}", server.host, server.port))?;

    tracing::info!(
        host = %server.host,
        port = server.port,
        environment = server.environment.as_str(),
        "Staff evaluation API listening"
    );

    axum::serve(listener, api::router::router(state))
        .with_graceful_shutdown(core::shutdown::shutdown_signal())
        .await?;
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use user_service::{config::Config, db, routes, state::AppState, store::PgUserStore, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let providers = telemetry::init_telemetry(&config)?;

    let options = db::connect_options(config.database_url.as_deref())?;
    match db::check(&options).await {
        Ok(()) => tracing::info!("Database reachable"),
        Err(err) => tracing::warn!(error = ?err, "Database not reachable at startup"),
    }

    let state = AppState::new(Arc::new(PgUserStore::new(options)));
    let app = routes::create_router(state);

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(providers) = providers {
        providers.shutdown();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, flushing telemetry...");
}

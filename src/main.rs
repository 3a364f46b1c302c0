//! run-tracker server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use run_tracker::api::{create_router, AppState};
use run_tracker::config::{AppConfig, LogFormat};
use run_tracker::storage::{create_storage, RunStore, StorageConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let storage_config = config
        .storage_runtime()
        .context("invalid storage configuration")?;

    match &storage_config {
        StorageConfig::Sqlite { path, .. } => {
            tracing::info!(path = %path.display(), "Database path")
        }
        StorageConfig::Memory => tracing::info!("Using in-memory run store"),
    }

    let store: Arc<dyn RunStore> = Arc::from(
        create_storage(storage_config)
            .await
            .context("failed to open run store")?,
    );

    log_snapshot(store.as_ref()).await;

    let router = create_router(AppState::new(store));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Server is running");

    axum::serve(listener, router).await?;

    Ok(())
}

/// Startup sanity read of the table; a failure is logged, not fatal
async fn log_snapshot(store: &dyn RunStore) {
    match store.list().await {
        Ok(runs) => {
            tracing::info!(rows = runs.len(), "Run table reachable");
            tracing::debug!(?runs, "Sample data");
        }
        Err(err) => tracing::error!(error = %err, "Database error during startup read"),
    }
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("run_tracker=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}

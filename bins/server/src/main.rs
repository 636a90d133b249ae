//! PDV settlement server.
//!
//! Serves the approval hook and the operator reconciliation API on top of
//! the SQLite settlement ledger.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdv_api::{AppState, create_router};
use pdv_core::settlement::SettlementService;
use pdv_core::split::{SplitConfigHandle, SplitConfiguration};
use pdv_db::migration::{Migrator, MigratorTrait};
use pdv_db::{SettlementRepository, connect_with};
use pdv_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdv=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Refuse to start on an invalid percentage.
    let split_config = SplitConfiguration::try_from(&config.split)
        .context("Invalid split configuration")?;
    info!(
        platform_percent = %split_config.platform_percent,
        merchant_percent = %split_config.merchant_percent(),
        currency = %split_config.currency,
        "Split configuration loaded"
    );

    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.database.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to apply migrations")?;
        info!("Migrations applied");
    }

    let ledger = Arc::new(SettlementRepository::new(db));
    let service = SettlementService::new(ledger, SplitConfigHandle::new(split_config));
    let state = AppState::new(Arc::new(service), &config.api.operator_token);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}

//! SQLite persistence for the pending-settlement ledger.
//!
//! This crate provides:
//! - The `SeaORM` entity for `settlement_entries`
//! - `SettlementRepository`, the durable `SettlementLedger`
//! - Schema migrations, including the append-only triggers

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::SettlementRepository;

use std::time::Duration;

use pdv_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database with default pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using `config`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    tracing::debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to settlement database"
    );
    Database::connect(options).await
}

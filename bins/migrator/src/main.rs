//! Database migration runner for the settlement ledger.
//!
//! Connects to the same database as the server: `database.url` from
//! `config/`, overridable with `PDV__DATABASE__URL`.
//!
//! Usage:
//!   migrator up      - Run all pending migrations (default)
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and reapply all migrations

use std::str::FromStr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdv_db::migration::{Migrator, MigratorTrait};
use pdv_shared::DatabaseConfig;

/// Migration subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MigrateCommand {
    Up,
    Down,
    Status,
    Fresh,
}

impl FromStr for MigrateCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "status" => Ok(Self::Status),
            "fresh" => Ok(Self::Fresh),
            other => anyhow::bail!("unknown command {other:?}, expected up, down, status or fresh"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "migrator=info,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = std::env::args()
        .nth(1)
        .map_or(Ok(MigrateCommand::Up), |arg| arg.parse())?;

    let config = DatabaseConfig::load().context("Failed to load database configuration")?;
    let db = pdv_db::connect(&config.url)
        .await
        .context("Failed to connect to database")?;
    info!(url = %config.url, ?command, "Running migrations");

    match command {
        MigrateCommand::Up => Migrator::up(&db, None).await?,
        MigrateCommand::Down => Migrator::down(&db, Some(1)).await?,
        MigrateCommand::Status => Migrator::status(&db).await?,
        MigrateCommand::Fresh => Migrator::fresh(&db).await?,
    }

    info!("Done");
    Ok(())
}

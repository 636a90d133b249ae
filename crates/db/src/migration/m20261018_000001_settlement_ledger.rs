//! Settlement ledger schema.
//!
//! Creates the append-only settlement_entries table. Integrity rules live in
//! the schema so they hold even for writers that bypass the repository:
//! - amounts are non-negative and the shares add up to the total
//! - at most one PENDING entry per transaction reference
//! - rows are never deleted and only move from PENDING to RESOLVED

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        // Trigger bodies contain semicolons, so statements run one at a time.
        for statement in UP_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in DOWN_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

const CREATE_TABLE_SQL: &str = r"
CREATE TABLE settlement_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_reference TEXT NOT NULL,
    currency TEXT NOT NULL,
    total_amount INTEGER NOT NULL,
    merchant_amount INTEGER NOT NULL,
    platform_amount INTEGER NOT NULL,
    platform_percent TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING',
    created_at TEXT NOT NULL,
    resolved_at TEXT,
    CONSTRAINT chk_reference_not_blank CHECK (length(trim(transaction_reference)) > 0),
    CONSTRAINT chk_amounts_non_negative
        CHECK (total_amount >= 0 AND merchant_amount >= 0 AND platform_amount >= 0),
    CONSTRAINT chk_shares_sum CHECK (merchant_amount + platform_amount = total_amount),
    CONSTRAINT chk_status CHECK (status IN ('PENDING', 'RESOLVED')),
    CONSTRAINT chk_resolved_at CHECK (
        (status = 'PENDING' AND resolved_at IS NULL)
        OR (status = 'RESOLVED' AND resolved_at IS NOT NULL)
    )
)";

// Serialization point for concurrent records of the same reference.
const PENDING_REFERENCE_INDEX_SQL: &str = r"
CREATE UNIQUE INDEX ux_settlement_pending_reference
    ON settlement_entries(transaction_reference)
    WHERE status = 'PENDING'";

const STATUS_INDEX_SQL: &str = r"
CREATE INDEX idx_settlement_status_created
    ON settlement_entries(status, created_at, id)";

const NO_DELETE_TRIGGER_SQL: &str = r"
CREATE TRIGGER trg_settlement_entries_no_delete
BEFORE DELETE ON settlement_entries
BEGIN
    SELECT RAISE(ABORT, 'settlement entries are append-only');
END";

const RESOLVE_ONLY_TRIGGER_SQL: &str = r"
CREATE TRIGGER trg_settlement_entries_resolve_only
BEFORE UPDATE ON settlement_entries
WHEN NOT (
    OLD.status = 'PENDING'
    AND NEW.status = 'RESOLVED'
    AND NEW.id = OLD.id
    AND NEW.transaction_reference = OLD.transaction_reference
    AND NEW.currency = OLD.currency
    AND NEW.total_amount = OLD.total_amount
    AND NEW.merchant_amount = OLD.merchant_amount
    AND NEW.platform_amount = OLD.platform_amount
    AND NEW.platform_percent = OLD.platform_percent
    AND NEW.created_at = OLD.created_at
)
BEGIN
    SELECT RAISE(ABORT, 'settlement entries only move from PENDING to RESOLVED');
END";

const UP_SQL: [&str; 5] = [
    CREATE_TABLE_SQL,
    PENDING_REFERENCE_INDEX_SQL,
    STATUS_INDEX_SQL,
    NO_DELETE_TRIGGER_SQL,
    RESOLVE_ONLY_TRIGGER_SQL,
];

const DOWN_SQL: [&str; 5] = [
    "DROP TRIGGER IF EXISTS trg_settlement_entries_resolve_only",
    "DROP TRIGGER IF EXISTS trg_settlement_entries_no_delete",
    "DROP INDEX IF EXISTS idx_settlement_status_created",
    "DROP INDEX IF EXISTS ux_settlement_pending_reference",
    "DROP TABLE IF EXISTS settlement_entries",
];

//! Settlement repository for database operations.
//!
//! Durable `SettlementLedger` backed by the settlement_entries table.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use pdv_core::clock::{Clock, SystemClock};
use pdv_core::settlement::{
    PendingSettlementEntry, SettlementError, SettlementLedger, SettlementStatus,
};
use pdv_core::split::SplitResult;
use pdv_shared::types::{Currency, PageRequest, SettlementEntryId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use tracing::{debug, error};

use crate::entities::settlement_entries;

/// Settlement repository.
///
/// Concurrent `record` calls for one reference are serialized by the
/// partial unique index on pending references; `mark_resolved` is a single
/// conditional update.
#[derive(Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl SettlementRepository {
    /// Creates a new settlement repository using wall-clock time.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Creates a new settlement repository using `clock` for timestamps.
    #[must_use]
    pub fn with_clock(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

fn storage_error(err: &DbErr) -> SettlementError {
    error!(error = %err, "Settlement storage failure");
    SettlementError::storage(err.to_string())
}

fn map_insert_error(err: &DbErr, reference: &str) -> SettlementError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            debug!(transaction_reference = %reference, "Rejected duplicate pending settlement");
            SettlementError::DuplicateTransaction(reference.to_string())
        }
        _ => storage_error(err),
    }
}

fn to_entry(model: settlement_entries::Model) -> Result<PendingSettlementEntry, SettlementError> {
    let id = SettlementEntryId::from_raw(model.id);
    let currency = Currency::from_str(&model.currency).map_err(SettlementError::storage)?;
    let status = SettlementStatus::from_str(&model.status).map_err(SettlementError::storage)?;
    let platform_percent = Decimal::from_str(&model.platform_percent).map_err(|e| {
        SettlementError::storage(format!("entry {id} has an unreadable percentage: {e}"))
    })?;

    let split = SplitResult::from_parts(
        model.transaction_reference,
        currency,
        model.total_amount,
        model.merchant_amount,
        model.platform_amount,
        platform_percent,
    )
    .map_err(|e| SettlementError::storage(format!("entry {id} holds an invalid split: {e}")))?;

    PendingSettlementEntry::restore(id, split, status, model.created_at, model.resolved_at)
}

fn to_entries(
    models: Vec<settlement_entries::Model>,
) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
    models.into_iter().map(to_entry).collect()
}

#[async_trait]
impl SettlementLedger for SettlementRepository {
    async fn record(&self, split: SplitResult) -> Result<PendingSettlementEntry, SettlementError> {
        let model = settlement_entries::ActiveModel {
            transaction_reference: Set(split.transaction_reference().to_string()),
            currency: Set(split.currency().to_string()),
            total_amount: Set(split.total_amount()),
            merchant_amount: Set(split.merchant_amount()),
            platform_amount: Set(split.platform_amount()),
            platform_percent: Set(split.platform_percent().to_string()),
            status: Set(SettlementStatus::Pending.as_str().to_string()),
            created_at: Set(self.clock.now()),
            resolved_at: Set(None),
            ..Default::default()
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error(&e, split.transaction_reference()))?;
        to_entry(inserted)
    }

    async fn list_pending(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
        let models = settlement_entries::Entity::find()
            .filter(settlement_entries::Column::Status.eq(SettlementStatus::Pending.as_str()))
            .order_by_asc(settlement_entries::Column::CreatedAt)
            .order_by_asc(settlement_entries::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error(&e))?;
        to_entries(models)
    }

    async fn mark_resolved(
        &self,
        id: SettlementEntryId,
    ) -> Result<PendingSettlementEntry, SettlementError> {
        let result = settlement_entries::Entity::update_many()
            .col_expr(
                settlement_entries::Column::Status,
                Expr::value(SettlementStatus::Resolved.as_str()),
            )
            .col_expr(
                settlement_entries::Column::ResolvedAt,
                Expr::value(self.clock.now()),
            )
            .filter(settlement_entries::Column::Id.eq(id.into_inner()))
            .filter(settlement_entries::Column::Status.eq(SettlementStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| storage_error(&e))?;

        if result.rows_affected == 0 {
            // Nothing matched: either the id is unknown or it is not pending.
            return match self.find(id).await? {
                None => Err(SettlementError::NotFound(id)),
                Some(_) => Err(SettlementError::AlreadyResolved(id)),
            };
        }

        self.find(id).await?.ok_or(SettlementError::NotFound(id))
    }

    async fn find(
        &self,
        id: SettlementEntryId,
    ) -> Result<Option<PendingSettlementEntry>, SettlementError> {
        settlement_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| storage_error(&e))?
            .map(to_entry)
            .transpose()
    }

    async fn entries(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
        let models = settlement_entries::Entity::find()
            .order_by_asc(settlement_entries::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| storage_error(&e))?;
        to_entries(models)
    }

    async fn list_page(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<PendingSettlementEntry>, u64), SettlementError> {
        let total = settlement_entries::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| storage_error(&e))?;

        let models = settlement_entries::Entity::find()
            .order_by_desc(settlement_entries::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| storage_error(&e))?;

        Ok((to_entries(models)?, total))
    }
}

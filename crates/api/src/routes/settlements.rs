//! Settlement routes.
//!
//! `POST /settlements` is the approval hook: it is called once per approved
//! PIX payment and records the platform's share as pending. The remaining
//! routes back the operator's reconciliation workflow.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use pdv_core::settlement::{PendingSettlementEntry, SettlementStatus};
use pdv_shared::types::{PageRequest, PageResponse, SettlementEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// Creates the settlement routes (operator auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settlements", get(list_settlements).post(record_settlement))
        .route("/settlements/pending", get(list_pending))
        .route("/settlements/report", get(get_report))
        .route("/settlements/{id}", get(get_settlement))
        .route("/settlements/{id}/resolve", post(resolve_settlement))
}

/// An approved payment to split.
#[derive(Debug, Deserialize)]
pub struct RecordSettlementRequest {
    /// Gateway reference of the approved payment.
    pub transaction_reference: String,
    /// Payment total in major units, e.g. `"10.00"`.
    pub total_amount: Decimal,
}

/// A ledger entry as returned by the API. Amounts are in minor units.
#[derive(Debug, Serialize)]
pub struct SettlementEntryResponse {
    /// Entry id.
    pub id: SettlementEntryId,
    /// Gateway reference of the payment.
    pub transaction_reference: String,
    /// Currency code.
    pub currency: String,
    /// Payment total.
    pub total_amount: i64,
    /// Merchant share.
    pub merchant_amount: i64,
    /// Platform share.
    pub platform_amount: i64,
    /// Platform percentage used for this split.
    pub platform_percent: Decimal,
    /// Merchant percentage used for this split.
    pub merchant_percent: Decimal,
    /// `PENDING` or `RESOLVED`.
    pub status: SettlementStatus,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
    /// When the entry was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<PendingSettlementEntry> for SettlementEntryResponse {
    fn from(entry: PendingSettlementEntry) -> Self {
        let split = entry.split();
        Self {
            id: entry.id(),
            transaction_reference: split.transaction_reference().to_string(),
            currency: split.currency().to_string(),
            total_amount: split.total_amount(),
            merchant_amount: split.merchant_amount(),
            platform_amount: split.platform_amount(),
            platform_percent: split.platform_percent(),
            merchant_percent: split.merchant_percent(),
            status: entry.status(),
            created_at: entry.created_at(),
            resolved_at: entry.resolved_at(),
        }
    }
}

fn to_responses(entries: Vec<PendingSettlementEntry>) -> Vec<SettlementEntryResponse> {
    entries.into_iter().map(Into::into).collect()
}

/// POST `/settlements` - Split an approved payment and record it as pending.
async fn record_settlement(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordSettlementRequest>,
) -> impl IntoResponse {
    match state
        .settlements
        .settle_approved_payment(&payload.transaction_reference, payload.total_amount)
        .await
    {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(SettlementEntryResponse::from(entry)),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/settlements` - Full ledger history, newest first.
async fn list_settlements(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    match state.settlements.history(&page).await {
        Ok(history) => {
            let response = PageResponse {
                data: to_responses(history.data),
                meta: history.meta,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/settlements/pending` - Entries still owed to the platform, oldest first.
async fn list_pending(State(state): State<AppState>) -> impl IntoResponse {
    match state.settlements.pending().await {
        Ok(entries) => (StatusCode::OK, Json(to_responses(entries))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/settlements/report` - Reconciliation summary.
async fn get_report(State(state): State<AppState>) -> impl IntoResponse {
    match state.settlements.report().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET `/settlements/{id}` - One entry.
async fn get_settlement(
    State(state): State<AppState>,
    Path(id): Path<SettlementEntryId>,
) -> impl IntoResponse {
    match state.settlements.entry(id).await {
        Ok(entry) => (StatusCode::OK, Json(SettlementEntryResponse::from(entry))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST `/settlements/{id}/resolve` - Mark the platform share as transferred.
async fn resolve_settlement(
    State(state): State<AppState>,
    Path(id): Path<SettlementEntryId>,
) -> impl IntoResponse {
    match state.settlements.resolve(id).await {
        Ok(entry) => {
            info!(entry_id = %id, "Operator resolved settlement");
            (StatusCode::OK, Json(SettlementEntryResponse::from(entry))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

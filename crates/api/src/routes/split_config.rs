//! Split configuration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use pdv_core::split::SplitConfiguration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;

/// Creates the split configuration routes (operator auth applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new().route("/split-config", get(get_split_config).put(update_split_config))
}

/// Request body for changing the platform percentage.
#[derive(Debug, Deserialize)]
pub struct UpdateSplitConfigRequest {
    /// New platform percentage, 0 to 100.
    pub platform_percent: Decimal,
}

/// Current split configuration.
#[derive(Debug, Serialize)]
pub struct SplitConfigResponse {
    /// Platform share in percent.
    pub platform_percent: Decimal,
    /// Merchant share in percent, always `100 - platform_percent`.
    pub merchant_percent: Decimal,
    /// Currency payments are denominated in.
    pub currency: String,
}

impl From<SplitConfiguration> for SplitConfigResponse {
    fn from(config: SplitConfiguration) -> Self {
        Self {
            platform_percent: config.platform_percent.value(),
            merchant_percent: config.merchant_percent(),
            currency: config.currency.to_string(),
        }
    }
}

/// GET `/split-config` - Current percentages.
async fn get_split_config(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.settlements.split_config();
    (StatusCode::OK, Json(SplitConfigResponse::from(config)))
}

/// PUT `/split-config` - Change the platform percentage for future payments.
async fn update_split_config(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateSplitConfigRequest>,
) -> impl IntoResponse {
    match state
        .settlements
        .update_platform_percent(payload.platform_percent)
    {
        Ok(config) => (StatusCode::OK, Json(SplitConfigResponse::from(config))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

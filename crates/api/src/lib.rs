//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - Operator REST routes for split configuration and settlements
//! - Bearer-token middleware guarding the operator routes
//! - JSON error responses mapped from `AppError`
//! - A JSON body extractor with matching rejections

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use pdv_core::settlement::SettlementService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::hash_token;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Split computation and the pending-settlement ledger.
    pub settlements: Arc<SettlementService>,
    /// SHA-256 hex digest of the operator bearer token.
    pub operator_token_hash: Arc<str>,
}

impl AppState {
    /// Creates the state, keeping only a digest of `operator_token`.
    #[must_use]
    pub fn new(settlements: Arc<SettlementService>, operator_token: &str) -> Self {
        Self {
            settlements,
            operator_token_hash: hash_token(operator_token).into(),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

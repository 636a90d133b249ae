//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::operator_auth};

pub mod health;
pub mod settlements;
pub mod split_config;

/// Creates the API router; everything except health requires the operator token.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(split_config::routes())
        .merge(settlements::routes())
        .layer(middleware::from_fn_with_state(state, operator_auth));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

//! Operator authentication middleware.
//!
//! Operator routes require `Authorization: Bearer <token>`. Only the SHA-256
//! digest of the configured token is kept in memory, and requests are
//! checked by comparing digests.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pdv_shared::AppError;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;

/// Hashes a bearer token for comparison.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(message: &str) -> Response {
    ApiError::from(AppError::Unauthorized(message.to_string())).into_response()
}

/// Rejects requests that do not carry the operator token.
pub async fn operator_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized("Authorization header with Bearer token is required");
    };

    if hash_token(token) != *state.operator_token_hash {
        warn!(path = %request.uri().path(), "Rejected request with invalid operator token");
        return unauthorized("Invalid operator token");
    }

    next.run(request).await
}

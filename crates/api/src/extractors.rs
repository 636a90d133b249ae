//! Request extractors.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json` body extractor whose rejections use the API's JSON error shape.
///
/// A missing field, a wrong type or a syntax error becomes
/// 400 `INVALID_ARGUMENT` instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

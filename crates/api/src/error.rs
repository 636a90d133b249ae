//! JSON error responses.
//!
//! Every failure the API returns, including auth and body rejections, is
//! rendered as `{ "error": code, "message": text }` with the `AppError`
//! status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdv_core::settlement::SettlementError;
use pdv_shared::AppError;
use serde_json::json;
use tracing::{debug, error};

/// Error code for request bodies that fail to parse.
const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Builds the response for `err`, reporting `code` and `detail`.
    ///
    /// Server-side failures are logged and their detail is not sent back.
    fn with_code(err: &AppError, code: &'static str, detail: String) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if err.is_server_error() {
            error!(error = %err, code, "Request failed");
            "An internal error occurred".to_string()
        } else {
            debug!(error = %detail, code, "Request rejected");
            detail
        };
        Self {
            status,
            code,
            message,
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let detail = err.to_string();
        Self::with_code(&err, err.error_code(), detail)
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        let code = err.error_code();
        let detail = err.to_string();
        Self::with_code(&AppError::from(err), code, detail)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        Self::with_code(&AppError::Validation(detail.clone()), INVALID_ARGUMENT, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

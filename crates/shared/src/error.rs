//! Application-wide error types.
//!
//! Domain errors convert into `AppError` at the crate boundary; the HTTP
//! layer only needs its status and error code.

use thiserror::Error;

/// Failure categories surfaced to API clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or wrong operator credentials.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// No such settlement entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request or domain input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate pending reference or already-resolved entry.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Ledger storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Generic error code, used when no more specific code is known.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Server-side failures; their detail is not shown to clients.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401, "UNAUTHORIZED")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::Conflict(String::new()), 409, "CONFLICT")]
    #[case(AppError::Database(String::new()), 500, "DATABASE_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
        assert_eq!(err.is_server_error(), status >= 500);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Unauthorized("bad token".into()).to_string(),
            "Authentication failed: bad token"
        );
        assert_eq!(
            AppError::Conflict("entry 3".into()).to_string(),
            "Conflict: entry 3"
        );
    }
}

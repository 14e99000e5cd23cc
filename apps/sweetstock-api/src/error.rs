//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in SweetStock                             │
//! │                                                                         │
//! │  Dashboard                   Rust Backend                               │
//! │  ─────────                   ────────────                               │
//! │                                                                         │
//! │  POST /api/sales/ { qty: 12 }                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad JSON / query? ─── JsonRejection ───────────────┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Ledger error? ─── DbError / CoreError ─────────► ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  409 { "detail": "Insufficient stock for product 3: requested 12,      │
//! │                   available 9",                                         │
//! │        "code": "INSUFFICIENT_STOCK" }                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unexpected failures are logged in full and reach the client only as a
//! generic 500.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sweetstock_core::{CoreError, ValidationError};
use sweetstock_db::DbError;
use tracing::{error, warn};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "detail": "Product not found: 42",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (422)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Live batches cannot cover the sale (409)
    InsufficientStock,

    /// Unique name, batch code or invoice already taken (409)
    Duplicate,

    /// A concurrent writer won, retry is safe (409)
    Conflict,

    /// Pool exhausted or database down (503)
    Unavailable,

    /// Internal server error (500)
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock | ErrorCode::Duplicate | ErrorCode::Conflict => {
                StatusCode::CONFLICT
            }
            ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of an error response.
#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
    code: ErrorCode,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error. The cause should already be logged.
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::InternalError, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: &self.message,
            code: self.code,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Conversions
// =============================================================================

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::Domain(core) => core.into(),
            dup @ DbError::Duplicate { .. } => ApiError::new(ErrorCode::Duplicate, dup.to_string()),
            conflict @ DbError::Conflict { .. } => {
                ApiError::new(ErrorCode::Conflict, conflict.to_string())
            }
            // Normally consumed by the retry loop.
            DbError::Busy(_) => ApiError::new(
                ErrorCode::Conflict,
                "Database is busy, retry the request",
            ),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::Unavailable, "Database is temporarily unavailable")
            }
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::internal()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            stock @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, stock.to_string())
            }
            overflow @ CoreError::Overflow { .. } => {
                warn!(error = %overflow, "Amount out of range");
                ApiError::validation(overflow.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DbError::not_found("Product", 4), StatusCode::NOT_FOUND),
            (DbError::duplicate("Supplier", "name", "Bikaner"), StatusCode::CONFLICT),
            (DbError::conflict("product 4", "busy"), StatusCode::CONFLICT),
            (DbError::PoolExhausted, StatusCode::SERVICE_UNAVAILABLE),
            (DbError::QueryFailed("syntax".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_insufficient_stock_keeps_numbers() {
        let err = ApiError::from(DbError::Domain(CoreError::InsufficientStock {
            product_id: 3,
            requested: 12,
            available: 9,
        }));
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("requested 12"));
        assert!(err.message.contains("available 9"));
    }

    #[test]
    fn test_overflow_is_reported_as_unprocessable() {
        let err = ApiError::from(DbError::Domain(CoreError::overflow("monthly revenue")));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "monthly revenue exceeds the supported range");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApiError::from(DbError::Internal("disk I/O error at page 7".into()));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_validation_maps_to_422() {
        let err = ApiError::from(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

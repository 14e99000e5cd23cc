//! Request extractors that reject with [`ApiError`] instead of axum's
//! plain-text rejections, so every 4xx carries `{detail, code}`.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use sweetstock_core::validation::validate_idempotency_key;

use crate::error::ApiError;

/// `Json<T>` body that fails with 422 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query<T>` that fails with 422 `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

/// `Path<T>` that fails with 422 `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";

/// Optional `Idempotency-Key` header, validated.
#[derive(Debug, Clone, Default)]
pub struct IdempotencyKey(pub Option<String>);

impl IdempotencyKey {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for IdempotencyKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(IDEMPOTENCY_HEADER) else {
            return Ok(IdempotencyKey(None));
        };

        let raw = value
            .to_str()
            .map_err(|_| ApiError::validation("Idempotency-Key must be visible ASCII"))?;

        Ok(IdempotencyKey(Some(validate_idempotency_key(raw.trim())?)))
    }
}

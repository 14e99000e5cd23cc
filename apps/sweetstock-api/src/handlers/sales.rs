//! # Sale Handlers
//!
//! ```text
//! POST /api/sales/ ─► AppJson<NewSale> ─► db.sales().record()
//!                                            │
//!              ┌─────────────────────────────┼──────────────────────────┐
//!              ▼                             ▼                          ▼
//!      201 Sale + allocations     409 INSUFFICIENT_STOCK      200 (replayed key)
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sweetstock_core::{NewSale, Sale};
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath, IdempotencyKey};
use crate::handlers::write_status;
use crate::AppState;

/// `GET /api/sales/`, newest first.
pub async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.db.sales().list().await?))
}

/// `POST /api/sales/`
pub async fn create_sale(
    State(state): State<AppState>,
    key: IdempotencyKey,
    AppJson(input): AppJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    debug!(product_id = input.product_id, quantity = input.quantity, "Create sale");

    let recorded = state.db.sales().record(input, key.as_deref()).await?;
    let status = write_status(&recorded);
    Ok((status, Json(recorded.into_inner())))
}

pub async fn get_sale(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Sale>> {
    Ok(Json(state.db.sales().get(id).await?))
}

//! Purchase handlers. A purchase is recorded as one new batch.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sweetstock_core::{NewPurchase, Purchase};
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath, AppQuery, IdempotencyKey};
use crate::handlers::write_status;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseFilter {
    pub product_id: Option<i64>,
    /// Only batches with stock left, in FIFO order.
    #[serde(default)]
    pub in_stock: bool,
}

/// `GET /api/purchases/[?product_id=&in_stock=true]`
///
/// Both forms return purchases; `in_stock` changes the filter and order only.
pub async fn list_purchases(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<PurchaseFilter>,
) -> ApiResult<Json<Vec<Purchase>>> {
    let batches = state.db.batches();

    let purchases = if filter.in_stock {
        batches.list_in_stock(filter.product_id).await?
    } else {
        batches.list(filter.product_id).await?
    };
    Ok(Json(purchases))
}

/// `POST /api/purchases/`
///
/// 201 with the new batch, or 200 with the original batch when the
/// `Idempotency-Key` was seen before.
pub async fn create_purchase(
    State(state): State<AppState>,
    key: IdempotencyKey,
    AppJson(input): AppJson<NewPurchase>,
) -> ApiResult<(StatusCode, Json<Purchase>)> {
    debug!(product_id = input.product_id, batch_code = %input.batch_code, "Create purchase");

    let recorded = state.db.batches().create(input, key.as_deref()).await?;
    let status = write_status(&recorded);
    Ok((status, Json(recorded.into_inner())))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Purchase>> {
    Ok(Json(state.db.batches().get(id).await?))
}

//! Stock views.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use sweetstock_core::{ExpiryAlert, StockOverview};

use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/stock/`
pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<StockOverview>> {
    Ok(Json(state.db.batches().overview().await?))
}

/// `GET /api/stock/expiring`, window from `ledger.expiry_alert_days`.
pub async fn expiring(State(state): State<AppState>) -> ApiResult<Json<Vec<ExpiryAlert>>> {
    let days = state.settings.ledger.expiry_alert_days;
    let today = Utc::now().date_naive();
    Ok(Json(state.db.batches().expiring_within(days, today).await?))
}

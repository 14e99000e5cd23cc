//! Report handlers. Every report is recomputed from the ledger per request.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use sweetstock_core::validation::validate_report_limit;
use sweetstock_core::{ProfitReport, SlowProduct, TopProduct};

use crate::error::ApiResult;
use crate::extract::AppQuery;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// `GET /api/reports/top-selling?limit=`
pub async fn top_selling(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LimitQuery>,
) -> ApiResult<Json<Vec<TopProduct>>> {
    let limit = validate_report_limit(query.limit)?;
    Ok(Json(state.db.reports().top_selling(limit).await?))
}

/// `GET /api/reports/slow-moving?limit=`
pub async fn slow_moving(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LimitQuery>,
) -> ApiResult<Json<Vec<SlowProduct>>> {
    let limit = validate_report_limit(query.limit)?;
    Ok(Json(state.db.reports().slow_moving(limit, Utc::now()).await?))
}

/// `GET /api/reports/monthly-profit`
pub async fn monthly_profit(State(state): State<AppState>) -> ApiResult<Json<ProfitReport>> {
    let currency = &state.settings.ledger.currency;
    Ok(Json(state.db.reports().monthly_profit(currency).await?))
}

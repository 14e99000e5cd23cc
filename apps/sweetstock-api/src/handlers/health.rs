//! Root info and liveness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "SweetStock API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": null,
    }))
}

/// `GET /health`: 200 after a database round-trip, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}

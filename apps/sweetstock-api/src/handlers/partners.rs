//! Supplier and retailer handlers.
//!
//! Deleting a partner never touches history: batches and sales keep their
//! name snapshot and lose only the live reference.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sweetstock_core::{NewRetailer, NewSupplier, Retailer, Supplier};

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::AppState;

// =============================================================================
// Suppliers
// =============================================================================

pub async fn list_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.suppliers().list().await?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewSupplier>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    let supplier = state.db.suppliers().create(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Supplier>> {
    Ok(Json(state.db.suppliers().get(id).await?))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<StatusCode> {
    state.db.suppliers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Retailers
// =============================================================================

pub async fn list_retailers(State(state): State<AppState>) -> ApiResult<Json<Vec<Retailer>>> {
    Ok(Json(state.db.retailers().list().await?))
}

pub async fn create_retailer(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewRetailer>,
) -> ApiResult<(StatusCode, Json<Retailer>)> {
    let retailer = state.db.retailers().create(input).await?;
    Ok((StatusCode::CREATED, Json(retailer)))
}

pub async fn get_retailer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Retailer>> {
    Ok(Json(state.db.retailers().get(id).await?))
}

pub async fn delete_retailer(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<StatusCode> {
    state.db.retailers().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

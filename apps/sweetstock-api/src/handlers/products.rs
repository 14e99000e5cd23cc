//! Catalog handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sweetstock_core::{NewProduct, Product};

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::AppState;

/// `GET /api/products/`, ordered by name.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list().await?))
}

/// `POST /api/products/`
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.db.products().create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().get(id).await?))
}

/// `PUT /api/products/{id}`. Renames keep every batch and sale attached.
pub async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(input): AppJson<NewProduct>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.db.products().update(id, input).await?))
}

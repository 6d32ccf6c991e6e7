//! Admin and storefront handlers for product types

use crate::{
    error::Result,
    models::{CreateProductTypeRequest, UpdateProductTypeRequest},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

pub async fn list_product_types(State(state): State<AppState>) -> Result<impl IntoResponse> {
    info!("GET /admin/product-types");
    let product_types = state.product_types.list_product_types().await?;
    Ok(Json(json!({ "product_types": product_types })))
}

pub async fn create_product_type(
    State(state): State<AppState>,
    Json(request): Json<CreateProductTypeRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /admin/product-types - slug: {}", request.slug);
    let product_type = state.product_types.create_product_type(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "product_type": product_type }))))
}

pub async fn get_product_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("GET /admin/product-types/{}", id);
    let product_type = state.product_types.get_product_type(&id).await?;
    Ok(Json(json!({ "product_type": product_type })))
}

pub async fn update_product_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProductTypeRequest>,
) -> Result<impl IntoResponse> {
    info!("PATCH /admin/product-types/{}", id);
    let product_type = state.product_types.update_product_type(&id, request).await?;
    Ok(Json(json!({ "product_type": product_type })))
}

pub async fn delete_product_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("DELETE /admin/product-types/{}", id);
    state.product_types.delete_product_type(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Storefront view: active product types only.
pub async fn list_store_product_types(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let product_types = state.product_types.list_active_product_types().await?;
    Ok(Json(json!({ "product_types": product_types })))
}

use crate::{
    error::Result,
    models::{
        AdminCustomProductQuery, CreateCustomProductRequest, CustomDataRequest,
        StoreCustomProductQuery, UpdateCustomProductRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

pub async fn list_custom_products(
    State(state): State<AppState>,
    Query(query): Query<AdminCustomProductQuery>,
) -> Result<impl IntoResponse> {
    info!("GET /admin/custom-products - product_type_id: {:?}", query.product_type_id);
    let products = state
        .product_types
        .list_custom_products(query.product_type_id.as_deref())
        .await?;
    Ok(Json(json!({ "products": products })))
}

pub async fn create_custom_product(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomProductRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /admin/custom-products - product_id: {}", request.product_id);
    let custom_product = state.product_types.create_custom_product(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "custom_product": custom_product }))))
}

pub async fn get_custom_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let custom_product = state.product_types.get_custom_product(&id).await?;
    Ok(Json(json!({ "custom_product": custom_product })))
}

pub async fn update_custom_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomProductRequest>,
) -> Result<impl IntoResponse> {
    info!("PUT /admin/custom-products/{}", id);
    let custom_product = state.product_types.update_custom_product(&id, request).await?;
    Ok(Json(json!({ "custom_product": custom_product })))
}

pub async fn delete_custom_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    info!("DELETE /admin/custom-products/{}", id);
    state.product_types.delete_custom_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_custom_data(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse> {
    let view = state.product_types.get_custom_data(&product_id).await?;
    Ok(Json(view))
}

pub async fn save_custom_data(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<CustomDataRequest>,
) -> Result<impl IntoResponse> {
    info!("POST /admin/products/{}/custom-data", product_id);
    let (custom_product, created) = state
        .product_types
        .save_custom_data(&product_id, request)
        .await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(json!({ "custom_product": custom_product }))))
}

pub async fn list_store_custom_products(
    State(state): State<AppState>,
    Query(query): Query<StoreCustomProductQuery>,
) -> Result<impl IntoResponse> {
    let page = state.product_types.list_store_products(&query).await?;
    Ok(Json(page))
}

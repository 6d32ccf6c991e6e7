//! Route table for the admin API, the storefront API and the payment callbacks

use crate::AppState;
use axum::{routing::get, Router};

use super::{custom_products, health, payments, product_types};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handle_health))
        .merge(admin_routes())
        .merge(store_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/product-types",
            get(product_types::list_product_types).post(product_types::create_product_type),
        )
        .route(
            "/admin/product-types/:id",
            get(product_types::get_product_type)
                .patch(product_types::update_product_type)
                .delete(product_types::delete_product_type),
        )
        .route(
            "/admin/custom-products",
            get(custom_products::list_custom_products).post(custom_products::create_custom_product),
        )
        .route(
            "/admin/custom-products/:id",
            get(custom_products::get_custom_product)
                .put(custom_products::update_custom_product)
                .delete(custom_products::delete_custom_product),
        )
        .route(
            "/admin/products/:id/custom-data",
            get(custom_products::get_custom_data).post(custom_products::save_custom_data),
        )
}

fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/store/product-types", get(product_types::list_store_product_types))
        .route("/store/custom-products", get(custom_products::list_store_custom_products))
        .route("/store/vnpay", axum::routing::post(payments::create_payment))
        .route("/store/vnpay/return", get(payments::payment_return))
        .route("/store/vnpay/ipn", get(payments::payment_ipn).post(payments::payment_ipn))
}

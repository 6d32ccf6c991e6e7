//! Storefront core: product type schemas, custom attribute validation and
//! VNPay payment verification, served over an axum router.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod payment;
pub mod schema;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use database::{get_database_pool, run_migrations, DatabaseManager};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use payment::VnpayGateway;
pub use services::{PaymentService, ProductTypeService};

use axum::Router;
use database::{CustomProductRepository, OrderRepository, ProductTypeRepository};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub db_manager: DatabaseManager,
    pub product_types: ProductTypeService,
    pub payments: PaymentService,
}

impl AppState {
    /// Wires repositories and services over one database pool.
    pub fn new(db_manager: DatabaseManager, config: &AppConfig) -> Self {
        let pool = db_manager.pool().clone();

        let product_types = ProductTypeService::new(
            ProductTypeRepository::new(pool.clone()),
            CustomProductRepository::new(pool.clone()),
        );
        let payments = PaymentService::new(
            VnpayGateway::new(config.vnpay.clone()),
            OrderRepository::new(pool),
        );

        Self {
            app_name: "Giftsmith".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            db_manager,
            product_types,
            payments,
        }
    }
}

pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .merge(create_routes())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(middleware::cors::cors_layer_from_config(&config.cors));

    middleware::logging::with_request_tracing(router).with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::warn;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, database) = match state.db_manager.health_check().await {
        Ok(()) => {
            let stats = state.db_manager.get_stats().await.ok();
            (StatusCode::OK, json!({ "status": "healthy", "stats": stats }))
        }
        Err(e) => {
            warn!("Health check found the database unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "unhealthy", "error": e.to_string() }),
            )
        }
    };

    let status = if status_code == StatusCode::OK { "healthy" } else { "unhealthy" };

    (
        status_code,
        Json(json!({
            "status": status,
            "app": state.app_name,
            "version": state.version,
            "timestamp": chrono::Utc::now().timestamp(),
            "database": database,
        })),
    )
}

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::AppState;

/// Health check endpoint
///
/// Used by clients as a startup probe. Answers 503 when storage is
/// unreachable so that a probing client falls back to local mode.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, db_status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    let body = json!({
        "status": if status.is_success() { "ok" } else { "unhealthy" },
        "timestamp": Utc::now().to_rfc3339(),
        "database": db_status,
        "version": env!("CARGO_PKG_VERSION"),
    });

    (status, Json(body))
}

//! Service metadata, health check and 404 fallback

use crate::AppState;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut features = vec!["auth", "postgres"];
    if state.quotes.cache_enabled() {
        features.push("cache");
    }

    Json(json!({
        "name": "cotacoes-api",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "features": features,
    }))
}

/// Overall health follows the persistence gateway; cache status is
/// reported separately and never flips the overall verdict.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.store.ping().await.is_ok();

    let mut body = json!({
        "status": if db_ok { "healthy" } else { "unhealthy" },
        "database": if db_ok { "connected" } else { "disconnected" },
        "timestamp": Utc::now().to_rfc3339(),
    });
    if let Some(cache_ok) = state.quotes.cache_ping().await {
        body["cache"] = json!(if cache_ok { "connected" } else { "disconnected" });
    }

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not found",
            "message": format!("no route for {}", uri.path()),
        })),
    )
}

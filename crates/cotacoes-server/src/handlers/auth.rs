//! Bootstrap-token issuance

use crate::error::ApiError;
use crate::services::bootstrap::TOKEN_WINDOW_SECS;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use cotacoes_core::CotacaoError;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct GenerateTokenRequest {
    secret: String,
}

pub async fn generate_token(
    State(state): State<AppState>,
    Json(req): Json<GenerateTokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.secret != state.boot_secret {
        return Err(CotacaoError::Unauthorized("invalid boot secret".to_string()).into());
    }

    let token = state.bootstrap.issue();
    info!("Bootstrap token issued");

    Ok(Json(json!({
        "success": true,
        "token": token,
        "expiresIn": TOKEN_WINDOW_SECS,
    })))
}

//! Handler-boundary translation of domain errors to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cotacoes_core::CotacaoError;
use serde_json::json;
use tracing::{error, warn};

/// Wrapper so handlers can `?` on core results and still produce a
/// structured JSON error body.
pub struct ApiError(pub CotacaoError);

impl From<CotacaoError> for ApiError {
    fn from(e: CotacaoError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CotacaoError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            CotacaoError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            CotacaoError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CotacaoError::Cache(msg) => {
                // Cache failures never surface to callers; log and keep going.
                warn!("Cache error reached the handler boundary: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            CotacaoError::Database(msg) | CotacaoError::Serialization(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            CotacaoError::Config(msg) => {
                error!("Config error during request handling: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

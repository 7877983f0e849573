//! Quote resource handlers
//!
//! Single-shot request/response transformations; all persistence and
//! caching policy lives in `QuoteService`.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use cotacoes_core::{AtualizaCotacao, Cotacao, Identity, NovaCotacao};
use tracing::info;

/// Liveness probe: 200 with an empty body.
pub async fn probe() -> StatusCode {
    StatusCode::OK
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Cotacao>>, ApiError> {
    Ok(Json(state.quotes.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cotacao>, ApiError> {
    Ok(Json(state.quotes.get(&id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Json(nova): Json<NovaCotacao>,
) -> Result<(StatusCode, Json<Cotacao>), ApiError> {
    let cotacao = state.quotes.create(nova).await?;
    info!(
        "Quote {} created by {}",
        cotacao.id,
        caller_name(&identity)
    );
    Ok((StatusCode::CREATED, Json(cotacao)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Option<Extension<Identity>>,
    Json(patch): Json<AtualizaCotacao>,
) -> Result<Json<Cotacao>, ApiError> {
    let updated = state.quotes.update(&id, patch).await?;
    info!("Quote {} updated by {}", id, caller_name(&identity));
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    identity: Option<Extension<Identity>>,
) -> Result<StatusCode, ApiError> {
    state.quotes.delete(&id).await?;
    info!("Quote {} deleted by {}", id, caller_name(&identity));
    Ok(StatusCode::NO_CONTENT)
}

fn caller_name(identity: &Option<Extension<Identity>>) -> &str {
    identity
        .as_ref()
        .map(|Extension(identity)| identity.username.as_str())
        .unwrap_or("session")
}

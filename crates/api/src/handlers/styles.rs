//! Handlers for the style catalog endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use restyle_core::styles::StyleDefinition;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub count: usize,
}

/// GET /styles -- the current catalog in source order.
pub async fn list_styles(State(state): State<AppState>) -> Json<Vec<StyleDefinition>> {
    Json(state.styles.snapshot().styles().to_vec())
}

/// POST /styles/reload -- re-read the catalog source and swap it in.
///
/// On failure the previous catalog stays active.
pub async fn reload_styles(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let registry = Arc::clone(&state.styles);
    let count = tokio::task::spawn_blocking(move || registry.reload())
        .await
        .map_err(|e| AppError::InternalError(format!("Style reload task failed: {e}")))??;

    tracing::info!(count, source = %state.styles.source().display(), "Style catalog reloaded");

    Ok(Json(ReloadResponse {
        message: format!("Successfully reloaded {count} styles"),
        count,
    }))
}

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Number of styles in the current catalog.
    pub styles_loaded: usize,
}

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
}

/// GET /health -- service status and catalog size.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let styles_loaded = state.styles.snapshot().len();
    let status = if styles_loaded > 0 { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        styles_loaded,
    })
}

/// GET / -- service banner.
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Image Transformer API",
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
}

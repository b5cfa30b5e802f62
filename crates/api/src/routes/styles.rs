//! Route definitions for the style catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::styles;
use crate::state::AppState;

/// Style routes mounted at `/styles`.
///
/// ```text
/// GET  /                  -> list_styles
/// POST /reload            -> reload_styles
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(styles::list_styles))
        .route("/reload", post(styles::reload_styles))
}

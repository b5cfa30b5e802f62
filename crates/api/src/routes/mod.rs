pub mod estimate;
pub mod generation;
pub mod health;
pub mod history;
pub mod styles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                 run a multi-style generation (POST, multipart)
/// /history                  full generation history (GET)
/// /styles                   current style catalog (GET)
/// /styles/reload            re-read the catalog source (POST)
/// /estimate                 price a prospective request (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .merge(history::router())
        .nest("/styles", styles::router())
        .merge(estimate::router())
}

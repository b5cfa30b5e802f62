use axum::routing::get;
use axum::Router;

use crate::handlers::estimate;
use crate::state::AppState;

/// ```text
/// GET /estimate?quality=&size=&count=   -> estimate_cost
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/estimate", get(estimate::estimate_cost))
}

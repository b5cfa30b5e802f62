use axum::extract::State;
use axum::Json;
use restyle_history::HistoryDocument;

use crate::state::AppState;

/// GET /history -- every recorded generation, oldest first.
///
/// Never fails: an unreadable log is reported as an empty history.
pub async fn list_history(State(state): State<AppState>) -> Json<HistoryDocument> {
    Json(HistoryDocument {
        generations: state.history.read_all().await,
    })
}

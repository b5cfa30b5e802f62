use std::sync::Arc;

use restyle_core::styles::StyleRegistry;
use restyle_history::{HistoryRecorder, HistoryStore};
use restyle_pipeline::GenerationOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc` or is a channel handle.
#[derive(Clone)]
pub struct AppState {
    /// Swappable style catalog.
    pub styles: Arc<StyleRegistry>,
    pub orchestrator: Arc<GenerationOrchestrator>,
    /// Read side of the history log.
    pub history: Arc<HistoryStore>,
    /// Write side of the history log; entries are persisted by the writer task.
    pub recorder: HistoryRecorder,
}

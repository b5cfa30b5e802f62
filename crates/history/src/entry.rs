use restyle_core::generation::{GenerationRecord, RequestSummary};
use restyle_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed generation as stored in the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: Timestamp,
    pub request: RequestSummary,
    pub response: GenerationRecord,
}

impl HistoryEntry {
    /// A fresh entry stamped with a new id and the current time.
    pub fn new(request: RequestSummary, response: GenerationRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            request,
            response,
        }
    }
}

/// On-disk shape of the history file, also returned by the history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub generations: Vec<HistoryEntry>,
}

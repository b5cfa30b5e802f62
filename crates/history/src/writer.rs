//! Detached history writer.
//!
//! [`HistoryRecorder`] is handed to request handlers; recording is a
//! non-blocking channel send. [`HistoryWriter::run`] is the single consumer
//! and the only code that writes the history file. It drains everything
//! queued and exits once every recorder has been dropped.

use std::sync::Arc;

use restyle_core::generation::{GenerationRecord, RequestSummary};
use tokio::sync::mpsc;

use crate::entry::HistoryEntry;
use crate::store::HistoryStore;

/// Cloneable handle for enqueuing completed generations.
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    sender: mpsc::UnboundedSender<HistoryEntry>,
}

impl HistoryRecorder {
    /// Create a recorder and the receiver its [`HistoryWriter`] consumes.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HistoryEntry>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Queue a generation for persistence. Returns immediately.
    pub fn record(&self, request: RequestSummary, response: GenerationRecord) {
        let entry = HistoryEntry::new(request, response);
        let id = entry.id;
        if self.sender.send(entry).is_err() {
            tracing::error!(%id, "History writer is gone, generation not recorded");
        }
    }
}

/// Background service that appends queued entries to the history store.
pub struct HistoryWriter;

impl HistoryWriter {
    /// Run the writer loop until the channel closes.
    pub async fn run(
        store: Arc<HistoryStore>,
        mut receiver: mpsc::UnboundedReceiver<HistoryEntry>,
    ) {
        while let Some(entry) = receiver.recv().await {
            let id = entry.id;
            match store.append_entry(entry).await {
                Ok(()) => tracing::debug!(%id, "Generation recorded in history"),
                Err(e) => tracing::error!(%id, error = %e, "Failed to record generation"),
            }
        }
        tracing::info!("History channel closed, writer shutting down");
    }

    /// Spawn the writer on the current runtime and return its recorder.
    pub fn spawn(store: Arc<HistoryStore>) -> (HistoryRecorder, tokio::task::JoinHandle<()>) {
        let (recorder, receiver) = HistoryRecorder::channel();
        let handle = tokio::spawn(Self::run(store, receiver));
        (recorder, handle)
    }
}

//! JSON file-backed history store.
//!
//! The whole log is one `{"generations": [...]}` document. Appends are a
//! read-modify-write serialized by a process-local mutex; the new document
//! is written to a sibling `.tmp` file and renamed over the original, so a
//! concurrent reader sees either the old or the new document.

use std::io;
use std::path::{Path, PathBuf};

use restyle_core::generation::{GenerationRecord, RequestSummary};
use tokio::sync::Mutex;

use crate::entry::{HistoryDocument, HistoryEntry};

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored entry, oldest first.
    ///
    /// A missing, empty or unparseable file reads as an empty history.
    pub async fn read_all(&self) -> Vec<HistoryEntry> {
        self.read_document().await.generations
    }

    /// Append a new entry built from `request` and `response`.
    pub async fn append(
        &self,
        request: RequestSummary,
        response: GenerationRecord,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry::new(request, response);
        self.append_entry(entry.clone()).await?;
        Ok(entry)
    }

    /// Append an already-built entry.
    pub async fn append_entry(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await;
        document.generations.push(entry);
        self.write_document(&document).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = document.generations.len(),
            "History entry appended",
        );
        Ok(())
    }

    async fn read_document(&self) -> HistoryDocument {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return HistoryDocument::default(),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to read history file, treating as empty",
                );
                return HistoryDocument::default();
            }
        };

        if contents.trim().is_empty() {
            return HistoryDocument::default();
        }

        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History file is not valid JSON, treating as empty",
                );
                HistoryDocument::default()
            }
        }
    }

    async fn write_document(&self, document: &HistoryDocument) -> Result<(), HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

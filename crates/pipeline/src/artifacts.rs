//! Filesystem artifact store.
//!
//! Originals live in the input directory, transforms and the short-lived
//! scratch copies sent to the remote API live in the output directory. Both
//! directories are served statically, so filenames double as URL paths.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use restyle_core::naming;

/// Number of attempts made to remove a scratch file.
pub const CLEANUP_ATTEMPTS: u32 = 3;

/// Pause between scratch removal attempts.
pub const CLEANUP_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create both directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.input_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Persist an original upload under a fresh unique name.
    ///
    /// Returns the filename. A partially written file is removed before the
    /// error is returned.
    pub async fn save_original(&self, bytes: &[u8]) -> io::Result<String> {
        let id = naming::artifact_id(chrono::Utc::now());
        let filename = naming::original_filename(&id);
        let path = self.input_dir.join(&filename);

        if let Err(e) = tokio::fs::write(&path, bytes).await {
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %cleanup,
                        "Failed to clean up partial original image",
                    );
                }
            }
            return Err(e);
        }

        tracing::debug!(filename = %filename, size = bytes.len(), "Stored original image");
        Ok(filename)
    }

    /// Location of `filename` inside the output directory.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }

    /// Write a scratch copy of an input image and return its path.
    pub async fn write_scratch(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.output_path(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Write a transformed output and return its path.
    pub async fn write_output(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.output_path(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Remove a scratch file, retrying with [`CLEANUP_BACKOFF`] between
    /// attempts. Never fails; returns whether the file is gone.
    pub async fn remove_scratch(&self, path: &Path) -> bool {
        remove_with_retry(path, CLEANUP_ATTEMPTS, CLEANUP_BACKOFF).await
    }
}

/// Best-effort file removal. A missing file counts as removed.
pub async fn remove_with_retry(path: &Path, attempts: u32, backoff: Duration) -> bool {
    for attempt in 1..=attempts {
        match tokio::fs::remove_file(path).await {
            Ok(()) => return true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return true,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    attempt,
                    error = %e,
                    "Failed to remove scratch file",
                );
                if attempt < attempts {
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    tracing::warn!(path = %path.display(), "Giving up on scratch file removal");
    false
}

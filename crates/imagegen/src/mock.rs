//! A scripted image editor for tests.
//!
//! Returns fixed bytes, optionally after a delay, and fails on chosen
//! prompts. Tracks call counts and the peak number of concurrent calls so
//! tests can assert on admission limits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::ImageEditError;
use crate::editor::{EditRequest, ImageEditor};

/// How a scripted prompt should fail.
#[derive(Debug, Clone)]
enum ScriptedFailure {
    Status(u16, String),
    Malformed,
    Panic,
}

pub struct MockImageEditor {
    output: Vec<u8>,
    delay: Duration,
    failures: HashMap<String, ScriptedFailure>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requests: Mutex<Vec<EditRequest>>,
}

impl MockImageEditor {
    /// An editor that immediately returns `output` for every request.
    pub fn new(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            delay: Duration::ZERO,
            failures: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer requests with this prompt with a non-2xx status.
    pub fn fail_prompt(mut self, prompt: impl Into<String>, status: u16) -> Self {
        self.failures.insert(
            prompt.into(),
            ScriptedFailure::Status(status, "scripted failure".into()),
        );
        self
    }

    /// Answer requests with this prompt with a 2xx body lacking image data.
    pub fn malformed_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.failures.insert(prompt.into(), ScriptedFailure::Malformed);
        self
    }

    /// Panic inside the call for requests with this prompt.
    pub fn panic_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.failures.insert(prompt.into(), ScriptedFailure::Panic);
        self
    }

    /// Total number of calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Copies of every request received, in arrival order.
    pub fn requests(&self) -> Vec<EditRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Decrements the in-flight counter however the call exits.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ImageEditor for MockImageEditor {
    async fn edit(&self, request: &EditRequest) -> Result<Vec<u8>, ImageEditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        // The real client reads the input from disk; so does the mock.
        tokio::fs::read(&request.image_path).await?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.failures.get(&request.prompt) {
            Some(ScriptedFailure::Status(status, body)) => Err(ImageEditError::ApiError {
                status: *status,
                body: body.clone(),
            }),
            Some(ScriptedFailure::Malformed) => Err(ImageEditError::MalformedResponse(
                "missing data[0].b64_json".into(),
            )),
            Some(ScriptedFailure::Panic) => panic!("scripted panic for {:?}", request.prompt),
            None => Ok(self.output.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;

    fn request(dir: &tempfile::TempDir, prompt: &str) -> EditRequest {
        let image_path = dir.path().join("in.png");
        std::fs::write(&image_path, b"png").unwrap();
        EditRequest {
            prompt: prompt.into(),
            image_path,
            size: "1024x1024".into(),
            quality: "low".into(),
        }
    }

    #[tokio::test]
    async fn returns_output_and_counts_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockImageEditor::new(b"out".to_vec());

        assert_eq!(mock.edit(&request(&dir, "a")).await.unwrap(), b"out");
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.requests()[0].prompt, "a");
    }

    #[tokio::test]
    async fn scripted_failures() {
        let dir = tempfile::tempdir().unwrap();
        let mock = MockImageEditor::new(b"out".to_vec())
            .fail_prompt("bad", 500)
            .malformed_prompt("weird");

        assert_matches!(
            mock.edit(&request(&dir, "bad")).await,
            Err(ImageEditError::ApiError { status: 500, .. })
        );
        assert_matches!(
            mock.edit(&request(&dir, "weird")).await,
            Err(ImageEditError::MalformedResponse(_))
        );
    }

    #[tokio::test]
    async fn scripted_panic_surfaces_as_join_error() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockImageEditor::new(b"out".to_vec()).panic_prompt("boom"));
        let req = request(&dir, "boom");

        let task = tokio::spawn({
            let mock = Arc::clone(&mock);
            async move { mock.edit(&req).await }
        });

        assert!(task.await.unwrap_err().is_panic());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn tracks_peak_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let mock =
            MockImageEditor::new(b"out".to_vec()).with_delay(Duration::from_millis(50));
        let mock = Arc::new(mock);
        let req = request(&dir, "p");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mock = Arc::clone(&mock);
                let req = req.clone();
                tokio::spawn(async move { mock.edit(&req).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(mock.calls(), 4);
        assert!(mock.peak_in_flight() >= 2);
    }
}

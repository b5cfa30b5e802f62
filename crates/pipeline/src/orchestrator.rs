//! Fan-out/fan-in generation orchestrator.
//!
//! Validates a request against one catalog snapshot, stores the original
//! upload, then runs one [`TransformWorker`] invocation per requested style.
//! At most `max_concurrent` invocations hold an admission permit at a time;
//! the permit is owned by the task and released however it exits. Every
//! invocation runs to completion and the join step collects all outcomes.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use restyle_core::generation::{
    validate_request, GenerationRecord, RequestSummary, StyleFailure, TransformResult,
};
use restyle_core::naming;
use restyle_core::pricing::calculate_cost;
use restyle_core::styles::{StyleDefinition, StyleRegistry};
use restyle_core::types::{ImageSize, Quality};
use restyle_imagegen::ImageEditor;

use crate::artifacts::ArtifactStore;
use crate::error::{PipelineError, TransformError};
use crate::worker::TransformWorker;

/// Default admission limit for concurrent remote calls.
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Raw, unvalidated generation input as received from a client.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: Vec<u8>,
    pub content_type: Option<String>,
    pub styles: Vec<String>,
    pub quality: String,
    pub size: String,
}

/// Result of a generation request that passed validation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub summary: RequestSummary,
    pub record: GenerationRecord,
}

pub struct GenerationOrchestrator {
    worker: Arc<TransformWorker>,
    store: Arc<ArtifactStore>,
    styles: Arc<StyleRegistry>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl GenerationOrchestrator {
    /// Build an orchestrator. `max_concurrent` is clamped to at least 1.
    pub fn new(
        editor: Arc<dyn ImageEditor>,
        store: Arc<ArtifactStore>,
        styles: Arc<StyleRegistry>,
        max_concurrent: usize,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            worker: Arc::new(TransformWorker::new(editor, Arc::clone(&store))),
            store,
            styles,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run a full generation request.
    ///
    /// Whole-request errors are validation failures (nothing written, no
    /// remote calls) and failure to store the original. Per-style failures
    /// are reported in [`GenerationRecord::failures`].
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, PipelineError> {
        let catalog = self.styles.snapshot();
        let validated = validate_request(
            request.content_type.as_deref(),
            request.image.len(),
            &request.styles,
            &request.quality,
            &request.size,
            &catalog,
        )?;
        let summary = validated.summary();

        let image: Arc<[u8]> = request.image.into();

        let original_name = self
            .store
            .save_original(&image)
            .await
            .map_err(PipelineError::Persistence)?;

        tracing::info!(
            styles = summary.styles.len(),
            quality = %validated.quality,
            size = %validated.size,
            original = %original_name,
            max_concurrent = self.max_concurrent,
            "Dispatching style transforms",
        );

        let dispatch_start = Instant::now();
        let (images, failures) = self
            .dispatch(image, validated.styles, validated.quality, validated.size)
            .await;
        let generation_time = dispatch_start.elapsed().as_secs_f64();

        let total_cost = calculate_cost(validated.quality, validated.size, images.len());

        tracing::info!(
            succeeded = images.len(),
            failed = failures.len(),
            total_cost,
            generation_time,
            "Generation complete",
        );

        Ok(GenerationOutcome {
            summary,
            record: GenerationRecord {
                images,
                original_image: Some(naming::input_url(&original_name)),
                total_cost,
                generation_time,
                failures,
            },
        })
    }

    /// Spawn one task per style and collect every outcome in completion order.
    async fn dispatch(
        &self,
        image: Arc<[u8]>,
        styles: Vec<StyleDefinition>,
        quality: Quality,
        size: ImageSize,
    ) -> (Vec<TransformResult>, Vec<StyleFailure>) {
        let mut pending: FuturesUnordered<_> = styles
            .into_iter()
            .map(|style| {
                let label = style.label.clone();
                let handle = tokio::spawn(run_admitted(
                    Arc::clone(&self.worker),
                    Arc::clone(&self.permits),
                    Arc::clone(&image),
                    style,
                    quality,
                    size,
                ));
                async move { (label, handle.await) }
            })
            .collect();

        let mut images = Vec::new();
        let mut failures = Vec::new();

        while let Some((label, joined)) = pending.next().await {
            match joined {
                Ok(Ok(result)) => images.push(result),
                Ok(Err(e)) => {
                    tracing::warn!(style = %label, error = %e, "Style transform failed");
                    failures.push(StyleFailure {
                        style: label,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(style = %label, error = %e, "Style transform task panicked");
                    failures.push(StyleFailure {
                        style: label,
                        error: "Transform task aborted unexpectedly".to_string(),
                    });
                }
            }
        }

        (images, failures)
    }
}

/// Wait for an admission permit, then run one transform.
async fn run_admitted(
    worker: Arc<TransformWorker>,
    permits: Arc<Semaphore>,
    image: Arc<[u8]>,
    style: StyleDefinition,
    quality: Quality,
    size: ImageSize,
) -> Result<TransformResult, TransformError> {
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|_| TransformError::LimiterClosed)?;

    worker.transform(&image, &style, quality, size).await
}

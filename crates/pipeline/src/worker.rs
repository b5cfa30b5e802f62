//! Single-style transform worker.
//!
//! Writes a scratch copy of the input, sends one edit request, stores the
//! decoded output under a unique name and reports timing. The scratch copy
//! is removed on every exit path.

use std::sync::Arc;
use std::time::Instant;

use restyle_core::generation::TransformResult;
use restyle_core::naming;
use restyle_core::styles::StyleDefinition;
use restyle_core::types::{ImageSize, Quality};
use restyle_imagegen::{EditRequest, ImageEditor};

use crate::artifacts::ArtifactStore;
use crate::error::TransformError;

pub struct TransformWorker {
    editor: Arc<dyn ImageEditor>,
    store: Arc<ArtifactStore>,
}

impl TransformWorker {
    pub fn new(editor: Arc<dyn ImageEditor>, store: Arc<ArtifactStore>) -> Self {
        Self { editor, store }
    }

    /// Transform `image` into `style`.
    pub async fn transform(
        &self,
        image: &[u8],
        style: &StyleDefinition,
        quality: Quality,
        size: ImageSize,
    ) -> Result<TransformResult, TransformError> {
        let started_at = chrono::Utc::now();
        let clock = Instant::now();

        let artifact_id = naming::artifact_id(started_at);
        let output_name = naming::output_filename(&style.style_id, &artifact_id);
        let scratch_name = naming::scratch_filename(&artifact_id);

        let outcome = self
            .edit_and_store(image, style, quality, size, &scratch_name, &output_name)
            .await;

        let scratch_path = self.store.output_path(&scratch_name);
        self.store.remove_scratch(&scratch_path).await;

        outcome?;

        let processing_time = clock.elapsed().as_secs_f64();
        tracing::info!(
            style = %style.label,
            output = %output_name,
            processing_time,
            "Style transform complete",
        );

        Ok(TransformResult {
            style: style.label.clone(),
            style_id: style.style_id.clone(),
            url: naming::output_url(&output_name),
            timestamp: started_at,
            processing_time,
        })
    }

    async fn edit_and_store(
        &self,
        image: &[u8],
        style: &StyleDefinition,
        quality: Quality,
        size: ImageSize,
        scratch_name: &str,
        output_name: &str,
    ) -> Result<(), TransformError> {
        let scratch_path = self.store.write_scratch(scratch_name, image).await?;

        let request = EditRequest {
            prompt: style.prompt.clone(),
            image_path: scratch_path,
            size: size.api_size(),
            quality: quality.as_str().to_string(),
        };

        tracing::info!(
            style = %style.label,
            size = %request.size,
            quality = %request.quality,
            "Sending style transform request",
        );

        let bytes = self.editor.edit(&request).await?;
        self.store.write_output(output_name, &bytes).await?;
        Ok(())
    }
}

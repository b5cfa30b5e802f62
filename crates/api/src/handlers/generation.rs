//! Handler for the multi-style generation endpoint.
//!
//! Parses the multipart upload, hands it to the orchestrator and queues the
//! outcome for the history writer before responding.

use axum::extract::{Multipart, State};
use axum::Json;
use restyle_core::generation::GenerationRecord;
use restyle_core::styles::StyleCatalog;
use restyle_core::types::{ImageSize, Quality};
use restyle_pipeline::GenerationRequest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Resolve one `styles` field value into labels.
///
/// A value that names a catalog style is taken whole, so labels may contain
/// commas. Anything else is read as a comma-separated list.
fn expand_styles(value: &str, catalog: &StyleCatalog) -> Vec<String> {
    let whole = value.trim();
    if catalog.contains(whole) {
        return vec![whole.to_string()];
    }
    whole
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the generation form: `image` (file), `styles` (repeated field or
/// comma list), `quality` and `size`. Unknown fields are ignored.
async fn read_generation_form(
    mut multipart: Multipart,
    catalog: &StyleCatalog,
) -> AppResult<GenerationRequest> {
    let mut image: Option<(Option<String>, Vec<u8>)> = None;
    let mut styles = Vec::new();
    let mut quality = None;
    let mut size = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                image = Some((content_type, bytes.to_vec()));
            }
            "styles" => {
                let value = field.text().await?;
                styles.extend(expand_styles(&value, catalog));
            }
            "quality" => quality = Some(field.text().await?.trim().to_string()),
            "size" => size = Some(field.text().await?.trim().to_string()),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    let (content_type, image) =
        image.ok_or_else(|| AppError::BadRequest("No image file provided".into()))?;

    Ok(GenerationRequest {
        image,
        content_type,
        styles,
        quality: quality.unwrap_or_else(|| Quality::default().as_str().to_string()),
        size: size.unwrap_or_else(|| ImageSize::default().as_str().to_string()),
    })
}

// ---------------------------------------------------------------------------
// POST /generate
// ---------------------------------------------------------------------------

/// Transform the uploaded image into every requested style.
///
/// Responds once every style has finished. Styles that failed are listed in
/// `failures`; the request itself only fails on validation or when the
/// original upload cannot be stored.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<GenerationRecord>> {
    let request = read_generation_form(multipart, &state.styles.snapshot()).await?;
    let outcome = state.orchestrator.generate(request).await?;

    state
        .recorder
        .record(outcome.summary, outcome.record.clone());

    Ok(Json(outcome.record))
}

//! Generation request validation and result record types.
//!
//! A request is validated in full against a single catalog snapshot before
//! any file is written or remote call is made.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::styles::{StyleCatalog, StyleDefinition};
use crate::types::{ImageSize, Quality, Timestamp};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One successfully transformed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    /// Style label as requested.
    pub style: String,
    pub style_id: String,
    /// Relative URL of the output artifact.
    pub url: String,
    /// When the worker started on this style.
    pub timestamp: Timestamp,
    /// Wall-clock seconds spent by the worker.
    pub processing_time: f64,
}

/// A style that was attempted and failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFailure {
    pub style: String,
    pub error: String,
}

/// Aggregate outcome of one generation request.
///
/// `images` only holds successes and is in completion order, not request
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub images: Vec<TransformResult>,
    pub original_image: Option<String>,
    pub total_cost: f64,
    /// Seconds from dispatch start to the last worker completion.
    pub generation_time: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<StyleFailure>,
}

/// The request parameters recorded in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub styles: Vec<String>,
    pub quality: Quality,
    pub size: ImageSize,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A request that passed validation, with styles resolved from the catalog
/// snapshot it was checked against.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub styles: Vec<StyleDefinition>,
    pub quality: Quality,
    pub size: ImageSize,
}

impl ValidatedRequest {
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            styles: self.styles.iter().map(|s| s.label.clone()).collect(),
            quality: self.quality,
            size: self.size,
        }
    }
}

/// Validate raw request fields.
///
/// Checks, in order: content type is `image/*`, image is non-empty, at least
/// one style, quality and size are known, every style exists in `catalog`.
/// Duplicate style labels are allowed and each is processed.
pub fn validate_request(
    content_type: Option<&str>,
    image_len: usize,
    styles: &[String],
    quality: &str,
    size: &str,
    catalog: &StyleCatalog,
) -> Result<ValidatedRequest, CoreError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => {}
        _ => {
            return Err(CoreError::Validation(
                "Uploaded file must be an image".to_string(),
            ))
        }
    }

    if image_len == 0 {
        return Err(CoreError::Validation(
            "Uploaded image is empty".to_string(),
        ));
    }

    if styles.is_empty() {
        return Err(CoreError::Validation(
            "At least one style must be selected".to_string(),
        ));
    }

    let quality = Quality::from_name(quality)?;
    let size = ImageSize::from_name(size)?;

    let resolved = styles
        .iter()
        .map(|label| {
            catalog
                .get(label)
                .cloned()
                .ok_or_else(|| CoreError::Validation(format!("Unknown style: {label}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedRequest {
        styles: resolved,
        quality,
        size,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

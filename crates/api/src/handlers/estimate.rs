//! Handler for pre-submission cost estimates.

use axum::extract::Query;
use axum::Json;
use restyle_core::error::CoreError;
use restyle_core::pricing::{self, CostEstimate};
use restyle_core::types::{ImageSize, Quality};
use serde::Deserialize;

use crate::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub quality: Option<String>,
    pub size: Option<String>,
    /// Number of styles to be generated (default: 1).
    pub count: Option<usize>,
}

/// GET /estimate -- price a request before submitting it.
pub async fn estimate_cost(Query(query): Query<EstimateQuery>) -> AppResult<Json<CostEstimate>> {
    let quality = match query.quality.as_deref() {
        Some(name) => Quality::from_name(name)?,
        None => Quality::default(),
    };
    let size = match query.size.as_deref() {
        Some(name) => ImageSize::from_name(name)?,
        None => ImageSize::default(),
    };

    let count = query.count.unwrap_or(1);
    if count == 0 {
        return Err(CoreError::Validation("count must be at least 1".into()).into());
    }

    Ok(Json(pricing::estimate(quality, size, count)))
}

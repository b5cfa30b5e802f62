//! Generation cost model.
//!
//! Pure pricing for image edits: a per-image base price keyed by quality,
//! a surcharge for rectangular sizes, multiplied by the image count.

use serde::Serialize;

use crate::types::{ImageSize, Quality};

// ---------------------------------------------------------------------------
// Price table
// ---------------------------------------------------------------------------

/// Per-image price at `low` quality (USD).
pub const LOW_QUALITY_PRICE: f64 = 0.011;
/// Per-image price at `medium` quality (USD). `auto` is billed at this rate.
pub const MEDIUM_QUALITY_PRICE: f64 = 0.042;
/// Per-image price at `high` quality (USD).
pub const HIGH_QUALITY_PRICE: f64 = 0.167;

/// Multiplier applied to portrait and landscape outputs.
pub const RECTANGULAR_MULTIPLIER: f64 = 1.5;

// ---------------------------------------------------------------------------
// Cost functions
// ---------------------------------------------------------------------------

/// Base per-image price for a quality level.
pub fn base_cost(quality: Quality) -> f64 {
    match quality {
        Quality::Low => LOW_QUALITY_PRICE,
        Quality::Medium | Quality::Auto => MEDIUM_QUALITY_PRICE,
        Quality::High => HIGH_QUALITY_PRICE,
    }
}

/// Size multiplier: 1.0 for square, [`RECTANGULAR_MULTIPLIER`] otherwise.
pub fn size_multiplier(size: ImageSize) -> f64 {
    if size.is_rectangular() {
        RECTANGULAR_MULTIPLIER
    } else {
        1.0
    }
}

/// Total cost of `count` images at the given quality and size.
pub fn calculate_cost(quality: Quality, size: ImageSize, count: usize) -> f64 {
    base_cost(quality) * size_multiplier(size) * count as f64
}

/// Cost breakdown returned by the estimate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub quality: Quality,
    pub size: ImageSize,
    pub count: usize,
    pub per_image: f64,
    pub total: f64,
}

/// Price a prospective request before it is submitted.
pub fn estimate(quality: Quality, size: ImageSize, count: usize) -> CostEstimate {
    CostEstimate {
        quality,
        size,
        count,
        per_image: calculate_cost(quality, size, 1),
        total: calculate_cost(quality, size, count),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

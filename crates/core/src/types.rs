//! Request option enums and shared type aliases.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// UTC timestamp used for artifacts and history entries.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

/// Rendering quality forwarded to the remote image API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Auto,
    Low,
    Medium,
    High,
}

impl Quality {
    /// All accepted quality names, in display order.
    pub const NAMES: &'static [&'static str] = &["auto", "low", "medium", "high"];

    /// Parse from the wire name (`"auto"`, `"low"`, ...).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "auto" => Ok(Self::Auto),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::Validation(format!(
                "Invalid quality option '{other}'. Must be one of: {:?}",
                Self::NAMES
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::Auto
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ImageSize
// ---------------------------------------------------------------------------

/// Logical output shape. Mapped to concrete pixel dimensions only when the
/// remote request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Square,
    Portrait,
    Landscape,
}

impl ImageSize {
    /// All accepted size names, in display order.
    pub const NAMES: &'static [&'static str] = &["square", "portrait", "landscape"];

    /// Parse from the wire name (`"square"`, `"portrait"`, `"landscape"`).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "square" => Ok(Self::Square),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(CoreError::Validation(format!(
                "Invalid size option '{other}'. Must be one of: {:?}",
                Self::NAMES
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }

    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1024, 1024),
            Self::Portrait => (1024, 1536),
            Self::Landscape => (1536, 1024),
        }
    }

    /// Dimensions in the `WIDTHxHEIGHT` form the image API expects.
    pub fn api_size(self) -> String {
        let (w, h) = self.dimensions();
        format!("{w}x{h}")
    }

    /// Whether the size is billed at the non-square rate.
    pub fn is_rectangular(self) -> bool {
        !matches!(self, Self::Square)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self::Square
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Style catalog and the reloadable registry that owns it.
//!
//! A [`StyleCatalog`] is an immutable, ordered set of [`StyleDefinition`]s
//! with an O(1) label index. The [`StyleRegistry`] holds the current catalog
//! behind an `Arc` and replaces it wholesale on reload, so a reader that
//! captured a snapshot keeps a consistent view for as long as it holds it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A named visual transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Display label; unique within a catalog and used as the lookup key.
    pub label: String,
    /// Backend identifier, also used as the output filename prefix.
    pub style_id: String,
    /// Natural-language instruction sent to the image API.
    pub prompt: String,
}

/// Errors raised while loading a catalog source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read style catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed style catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid style catalog: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// StyleCatalog
// ---------------------------------------------------------------------------

/// Immutable snapshot of the loaded styles.
#[derive(Debug, Default)]
pub struct StyleCatalog {
    styles: Vec<StyleDefinition>,
    by_label: HashMap<String, usize>,
}

impl StyleCatalog {
    /// Build a catalog from definitions, preserving their order.
    ///
    /// Rejects empty labels, empty or non filename-safe style ids and
    /// duplicate labels.
    pub fn from_definitions(styles: Vec<StyleDefinition>) -> Result<Self, CatalogError> {
        let mut by_label = HashMap::with_capacity(styles.len());

        for (idx, style) in styles.iter().enumerate() {
            if style.label.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "Style at index {idx} has an empty label"
                )));
            }
            if style.style_id.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "Style '{}' has an empty style_id",
                    style.label
                )));
            }
            if !is_valid_style_id(&style.style_id) {
                return Err(CatalogError::Invalid(format!(
                    "Style '{}' has an invalid style_id '{}' (allowed: A-Z a-z 0-9 _ -)",
                    style.label, style.style_id
                )));
            }
            if by_label.insert(style.label.clone(), idx).is_some() {
                return Err(CatalogError::Invalid(format!(
                    "Duplicate style label '{}'",
                    style.label
                )));
            }
        }

        Ok(Self { styles, by_label })
    }

    /// Read a JSON array of styles from `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let styles: Vec<StyleDefinition> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_definitions(styles)
    }

    pub fn get(&self, label: &str) -> Option<&StyleDefinition> {
        self.by_label.get(label).map(|&idx| &self.styles[idx])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// Styles in source order.
    pub fn styles(&self) -> &[StyleDefinition] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// A style id becomes part of an output filename and URL, so it must be a
/// single path segment: ASCII letters, digits, `_` and `-` only.
fn is_valid_style_id(id: &str) -> bool {
    id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

// ---------------------------------------------------------------------------
// StyleRegistry
// ---------------------------------------------------------------------------

/// Owns the live catalog and its source path.
///
/// Designed to be wrapped in `Arc` and shared across handlers. The lock only
/// guards the pointer swap; catalogs themselves are never mutated.
pub struct StyleRegistry {
    source: PathBuf,
    current: RwLock<Arc<StyleCatalog>>,
}

impl StyleRegistry {
    /// Load the initial catalog from `source`.
    pub fn load(source: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let source = source.into();
        let catalog = StyleCatalog::load(&source)?;
        Ok(Self::from_catalog(source, catalog))
    }

    /// Wrap an already-built catalog. `source` is used by later reloads.
    pub fn from_catalog(source: impl Into<PathBuf>, catalog: StyleCatalog) -> Self {
        Self {
            source: source.into(),
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog as of now. Callers should hold on to the returned `Arc`
    /// for the duration of a request rather than calling this repeatedly.
    pub fn snapshot(&self) -> Arc<StyleCatalog> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Re-read the source and swap the new catalog in.
    ///
    /// On error the previous catalog stays active. Returns the new style count.
    pub fn reload(&self) -> Result<usize, CatalogError> {
        let catalog = Arc::new(StyleCatalog::load(&self.source)?);
        let count = catalog.len();

        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = catalog;

        Ok(count)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

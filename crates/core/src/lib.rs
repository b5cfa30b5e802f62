//! Restyle domain core.
//!
//! Pure types and logic shared by the pipeline, history and API crates:
//! quality/size options, the cost model, the style catalog and its
//! swappable registry, artifact naming and generation record types.
//! Nothing in this crate performs network I/O.

pub mod error;
pub mod generation;
pub mod naming;
pub mod pricing;
pub mod styles;
pub mod types;

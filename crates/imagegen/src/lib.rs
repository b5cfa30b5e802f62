//! Client library for the remote image-edit API.
//!
//! Provides the [`ImageEditor`] seam used by the transform pipeline, the
//! reqwest-backed [`ImageEditApi`] that talks to the real service and, with
//! the `test-util` feature, a scripted `MockImageEditor` for tests.

pub mod api;
pub mod editor;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use api::{ImageApiConfig, ImageEditApi, ImageEditError};
pub use editor::{EditRequest, ImageEditor};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockImageEditor;

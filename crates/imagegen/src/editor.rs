//! The [`ImageEditor`] abstraction over the remote edit endpoint.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::api::ImageEditError;

/// One image-edit call: a single input image, a prompt, one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Instruction describing the target style.
    pub prompt: String,
    /// Path of the input image on disk. The file must exist for the whole
    /// duration of the call.
    pub image_path: PathBuf,
    /// Output dimensions as `WIDTHxHEIGHT`.
    pub size: String,
    /// Quality name (`auto`, `low`, `medium`, `high`).
    pub quality: String,
}

/// Anything that can turn an [`EditRequest`] into decoded output image bytes.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    async fn edit(&self, request: &EditRequest) -> Result<Vec<u8>, ImageEditError>;
}

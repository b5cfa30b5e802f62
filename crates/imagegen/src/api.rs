//! REST client for the image-edit endpoint.
//!
//! Sends one multipart `POST` per edit (image file, prompt, model, count,
//! size, quality) with a bearer credential and decodes the base64 image
//! returned in `data[0].b64_json`.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::editor::{EditRequest, ImageEditor};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default edit endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/images/edits";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-image-1";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the remote image API.
#[derive(Clone)]
pub struct ImageApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ImageApiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Default                                  |
    /// |--------------------------|------------------------------------------|
    /// | `OPENAI_API_KEY`         | empty (calls will be rejected remotely)  |
    /// | `IMAGE_API_URL`          | `https://api.openai.com/v1/images/edits` |
    /// | `IMAGE_MODEL`            | `gpt-image-1`                            |
    /// | `IMAGE_API_TIMEOUT_SECS` | `60`                                     |
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set; image edits will fail");
        }

        let timeout_secs = std::env::var("IMAGE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_url: std::env::var("IMAGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            api_key,
            model: std::env::var("IMAGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl std::fmt::Debug for ImageApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageApiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the image-edit API layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageEditError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Image API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered 2xx but the body was not the expected shape.
    #[error("Unexpected response format from image API: {0}")]
    MalformedResponse(String),

    /// The input image could not be read from disk.
    #[error("Failed to read input image: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct EditResponse {
    #[serde(default)]
    data: Vec<EditData>,
}

#[derive(Debug, Deserialize)]
struct EditData {
    b64_json: Option<String>,
}

/// Extract and decode the first image of an edit response body.
pub fn decode_edit_response(body: &str) -> Result<Vec<u8>, ImageEditError> {
    let parsed: EditResponse = serde_json::from_str(body)
        .map_err(|e| ImageEditError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let encoded = parsed
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or_else(|| ImageEditError::MalformedResponse("missing data[0].b64_json".into()))?;

    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| ImageEditError::MalformedResponse(format!("invalid base64 payload: {e}")))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the image-edit endpoint.
pub struct ImageEditApi {
    client: reqwest::Client,
    config: ImageApiConfig,
}

impl ImageEditApi {
    /// Create a client with its own connection pool.
    pub fn new(config: ImageApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Build the multipart body for one edit.
    async fn build_form(&self, request: &EditRequest) -> Result<Form, ImageEditError> {
        let bytes = tokio::fs::read(&request.image_path).await?;
        let file_name = file_name_of(&request.image_path);

        let image = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/png")?;

        Ok(Form::new()
            .part("image", image)
            .text("prompt", request.prompt.clone())
            .text("model", self.config.model.clone())
            .text("n", "1")
            .text("size", request.size.clone())
            .text("quality", request.quality.clone()))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ImageEditError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageEditError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageEditError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageEditor for ImageEditApi {
    async fn edit(&self, request: &EditRequest) -> Result<Vec<u8>, ImageEditError> {
        let form = self.build_form(request).await?;

        tracing::debug!(
            size = %request.size,
            quality = %request.quality,
            model = %self.config.model,
            "Sending image edit request",
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        decode_edit_response(&body)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

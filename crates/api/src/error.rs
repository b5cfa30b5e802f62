use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use restyle_core::error::CoreError;
use restyle_core::styles::CatalogError;
use restyle_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of the workspace crates and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `restyle_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A whole-request failure from the generation pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The style catalog could not be (re)loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The multipart upload could not be read.
    #[error("Invalid upload: {0}")]
    Upload(#[from] MultipartError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Pipeline(pipeline) => match pipeline {
                PipelineError::Validation(core) => classify_core_error(core),
                PipelineError::Persistence(err) => {
                    tracing::error!(error = %err, "Failed to persist original image");
                    internal_error()
                }
            },

            AppError::Catalog(err) => {
                tracing::error!(error = %err, "Style catalog reload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CATALOG_ERROR",
                    format!("Error reloading styles: {err}"),
                )
            }

            AppError::Upload(err) => (err.status(), "UPLOAD_ERROR", err.body_text()),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

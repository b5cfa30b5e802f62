use restyle_core::error::CoreError;
use restyle_imagegen::ImageEditError;

/// Failure of a single style's transform. Scoped to that style; siblings
/// are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The image API answered with a non-2xx status.
    #[error("Image API error ({status}): {body}")]
    RemoteApi { status: u16, body: String },

    /// The image API answered 2xx with an unexpected body.
    #[error("Malformed image API response: {0}")]
    MalformedResponse(String),

    /// The request never got a response (network, TLS, timeout).
    #[error("Image API request failed: {0}")]
    Transport(String),

    /// Writing the scratch input or the output artifact failed.
    #[error("Artifact persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// The admission limiter was shut down before a slot was granted.
    #[error("Admission limiter closed")]
    LimiterClosed,
}

impl From<ImageEditError> for TransformError {
    fn from(err: ImageEditError) -> Self {
        match err {
            ImageEditError::ApiError { status, body } => Self::RemoteApi { status, body },
            ImageEditError::MalformedResponse(msg) => Self::MalformedResponse(msg),
            ImageEditError::Request(e) => Self::Transport(e.to_string()),
            ImageEditError::Io(e) => Self::Persistence(e),
        }
    }
}

/// Failure of a whole generation request.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The request was rejected before any work started.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The original upload could not be stored; nothing was dispatched.
    #[error("Failed to persist original image: {0}")]
    Persistence(#[source] std::io::Error),
}

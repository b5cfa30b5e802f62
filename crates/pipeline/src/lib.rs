//! Image transformation pipeline.
//!
//! - [`ArtifactStore`]: filesystem directories for originals, outputs and
//!   scratch copies.
//! - [`TransformWorker`]: one image + one style through the remote editor.
//! - [`GenerationOrchestrator`]: validated fan-out of one worker per style
//!   under a shared admission limit, collecting every outcome.

pub mod artifacts;
pub mod error;
pub mod orchestrator;
pub mod worker;

pub use artifacts::ArtifactStore;
pub use error::{PipelineError, TransformError};
pub use orchestrator::{
    GenerationOrchestrator, GenerationOutcome, GenerationRequest, DEFAULT_MAX_CONCURRENT,
};
pub use worker::TransformWorker;

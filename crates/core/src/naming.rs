//! Artifact naming convention.
//!
//! Every persisted file gets an artifact id of the form
//! `{12 random hex chars}_{YYYYmmddHHMMSS}` so concurrent requests never
//! produce the same filename.

use crate::types::Timestamp;

/// URL prefix under which output transforms are served.
pub const OUTPUT_URL_PREFIX: &str = "/images";
/// URL prefix under which original uploads are served.
pub const INPUT_URL_PREFIX: &str = "/inputs";

/// Length of the random hex prefix of an artifact id.
const RANDOM_ID_LEN: usize = 12;

/// Generate a fresh artifact id stamped with `now`.
///
/// The random part comes from a v4 UUID.
pub fn artifact_id(now: Timestamp) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", &random[..RANDOM_ID_LEN], now.format("%Y%m%d%H%M%S"))
}

/// Filename for a transformed output: `{style_id}_{artifact_id}.png`.
pub fn output_filename(style_id: &str, artifact_id: &str) -> String {
    format!("{style_id}_{artifact_id}.png")
}

/// Filename for a scratch copy of the input sent to the remote API.
pub fn scratch_filename(artifact_id: &str) -> String {
    format!("temp_{artifact_id}.png")
}

/// Filename for the persisted original upload.
pub fn original_filename(artifact_id: &str) -> String {
    format!("original_{artifact_id}.png")
}

/// Public URL for an output transform.
pub fn output_url(filename: &str) -> String {
    format!("{OUTPUT_URL_PREFIX}/{filename}")
}

/// Public URL for an original upload.
pub fn input_url(filename: &str) -> String {
    format!("{INPUT_URL_PREFIX}/{filename}")
}

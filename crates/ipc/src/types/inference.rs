//! Request and response records for the remote inference worker.
//!
//! The worker sits behind a `runsync` style route: parameters are wrapped in
//! an `input` object on the way in and results arrive under `output`.

use serde::{Deserialize, Serialize};

use crate::IpcError;

/// Body of the single request sent to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub input: InferenceInput,
}

/// Parameters forwarded verbatim to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceInput {
    /// Original upload, standard base64. The deployed worker reads this key
    /// under its historical (misspelt) name.
    #[serde(rename = "ori_iamge", alias = "original_image")]
    pub original_image: String,
    /// PNG mask, standard base64. White opaque pixels mark removal.
    pub mask: String,
    pub scale: f32,
    pub step: u32,
}

impl SubmissionRequest {
    pub fn new(original_image: String, mask: String, scale: f32, step: u32) -> Self {
        Self {
            input: InferenceInput {
                original_image,
                mask,
                scale,
                step,
            },
        }
    }

    /// Serialize to the JSON body sent over the wire.
    pub fn to_json(&self) -> Result<Vec<u8>, IpcError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Worker reply. Only `output.result_image` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub output: InferenceOutput,
}

/// Result payload produced by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutput {
    /// Edited image, standard base64 (PNG)
    pub result_image: String,
}

impl SubmissionResponse {
    /// Parse a response body, failing closed on missing or mistyped fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, IpcError> {
        let response: Self = serde_json::from_slice(body)?;
        if response.output.result_image.trim().is_empty() {
            return Err(IpcError::InvalidFormat(
                "output.result_image is empty".to_string(),
            ));
        }
        Ok(response)
    }
}

//! Submission of image and mask to the remote inference worker
//!
//! The orchestrator validates and encodes the inputs, hands exactly one
//! request to an [`InferenceBackend`], and decodes the edited image that
//! comes back. Backends are pluggable so tests can stand in for the network.

mod encode;
mod orchestrator;
mod remote;

pub use encode::{SubmissionInput, decode_result_image, encode_request};
pub use orchestrator::{SubmissionOrchestrator, SubmissionState, SubmissionTicket};
pub use remote::RemoteInference;

use erasure_ipc::{SubmissionRequest, SubmissionResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    /// Result arrived for a submission that was reset or replaced
    #[error("Submission was superseded")]
    Superseded,

    #[error("Request failed (status {}): {message}", status_label(.status))]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Failed to encode payload: {0}")]
    Encode(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}

impl SubmitError {
    /// Stable identifier reported to the UI
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::AlreadySubmitting => "already_submitting",
            Self::Superseded => "superseded",
            Self::RequestFailed { .. } => "request_failed",
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
        }
    }

    /// HTTP status of the failed exchange, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

/// Trait for inference backends
#[allow(async_fn_in_trait)]
pub trait InferenceBackend {
    /// Perform one exchange. No retries: any failure is final for this call.
    async fn infer(&self, request: SubmissionRequest) -> Result<SubmissionResponse, SubmitError>;
}

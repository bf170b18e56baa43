//! Submission state machine
//!
//! `Idle -> Submitting -> {Succeeded | Failed}`, back to `Idle` on reset.
//! A submission is split into [`SubmissionOrchestrator::prepare`], the one
//! awaited backend call, and [`SubmissionOrchestrator::complete`], so a
//! single-threaded host never holds the orchestrator borrowed across the
//! suspension point.
//!
//! `prepare` hands out a [`SubmissionTicket`]. Only the ticket of the latest
//! prepared submission completes it; anything older, or anything issued
//! before a reset, is superseded and leaves the state untouched.

use erasure_config::InferenceConfig;
use erasure_ipc::{SubmissionRequest, SubmissionResponse};
use image::RgbaImage;
use tracing::{info, warn};

use crate::encode::{SubmissionInput, decode_result_image, encode_request};
use crate::{InferenceBackend, SubmitError};

/// Lifecycle of the current submission
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed {
        status: Option<u16>,
        message: String,
    },
}

/// Identifies one prepared submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

/// Owns the submission state and the parameters forwarded to the worker
#[derive(Debug, Clone)]
pub struct SubmissionOrchestrator {
    state: SubmissionState,
    config: InferenceConfig,
    /// Bumped on every prepare and reset
    generation: u64,
}

impl SubmissionOrchestrator {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            state: SubmissionState::Idle,
            config,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InferenceConfig) {
        self.config = config;
    }

    /// False while an exchange is in flight; the UI disables its trigger
    pub fn can_submit(&self) -> bool {
        self.state != SubmissionState::Submitting
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Validate and encode the inputs, then enter `Submitting`.
    ///
    /// On any error the state is left untouched and no exchange may be made.
    pub fn prepare(
        &mut self,
        input: SubmissionInput<'_>,
    ) -> Result<(SubmissionTicket, SubmissionRequest), SubmitError> {
        if self.is_submitting() {
            warn!("prepare: submission already in flight");
            return Err(SubmitError::AlreadySubmitting);
        }

        let request = encode_request(input, &self.config)?;
        self.generation += 1;
        info!("Submitting #{} to {}", self.generation, self.config.endpoint);
        self.state = SubmissionState::Submitting;
        Ok((SubmissionTicket(self.generation), request))
    }

    /// Whether `ticket` belongs to the submission currently in flight
    pub fn is_current(&self, ticket: SubmissionTicket) -> bool {
        self.is_submitting() && ticket.0 == self.generation
    }

    /// Record the outcome of the exchange and decode the result image.
    ///
    /// Transport, status and decode failures all land in `Failed`. An
    /// outcome for a ticket that is not current returns `Superseded` and
    /// changes nothing.
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<SubmissionResponse, SubmitError>,
    ) -> Result<RgbaImage, SubmitError> {
        if !self.is_current(ticket) {
            warn!(
                "Dropping result of submission #{} (current #{}, state={:?})",
                ticket.0, self.generation, self.state
            );
            return Err(SubmitError::Superseded);
        }

        match outcome.and_then(|response| decode_result_image(&response)) {
            Ok(image) => {
                info!(
                    "Submission succeeded: {}x{} result",
                    image.width(),
                    image.height()
                );
                self.state = SubmissionState::Succeeded;
                Ok(image)
            }
            Err(err) => {
                warn!("Submission failed: {err}");
                self.state = SubmissionState::Failed {
                    status: err.status(),
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Prepare, perform the exchange, and complete in one call
    pub async fn submit<B: InferenceBackend>(
        &mut self,
        backend: &B,
        input: SubmissionInput<'_>,
    ) -> Result<RgbaImage, SubmitError> {
        let (ticket, request) = self.prepare(input)?;
        let outcome = backend.infer(request).await;
        self.complete(ticket, outcome)
    }

    /// Return to `Idle`; every ticket issued so far becomes stale
    pub fn reset(&mut self) {
        if self.is_submitting() {
            warn!("reset: submission #{} will be dropped", self.generation);
        }
        self.generation += 1;
        self.state = SubmissionState::Idle;
    }
}

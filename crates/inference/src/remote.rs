//! HTTP client for the remote inference worker

use erasure_config::InferenceConfig;
use erasure_ipc::{SubmissionRequest, SubmissionResponse};
use reqwest::Client;
use tracing::{debug, warn};

use crate::{InferenceBackend, SubmitError};

/// Posts one JSON request to the configured endpoint and parses the reply
#[derive(Debug, Clone)]
pub struct RemoteInference {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoteInference {
    pub fn new(config: &InferenceConfig) -> Result<Self, SubmitError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();

        // Browser fetch has no client-side timeout
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| SubmitError::RequestFailed {
            status: None,
            message: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &InferenceConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl InferenceBackend for RemoteInference {
    async fn infer(&self, request: SubmissionRequest) -> Result<SubmissionResponse, SubmitError> {
        let body = request
            .to_json()
            .map_err(|e| SubmitError::Encode(e.to_string()))?;
        debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {e}", self.endpoint);
            SubmitError::RequestFailed {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::RequestFailed {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| SubmitError::RequestFailed {
            status: Some(status.as_u16()),
            message: format!("failed to read body: {e}"),
        })?;
        SubmissionResponse::from_slice(&bytes).map_err(|e| SubmitError::Decode(e.to_string()))
    }
}

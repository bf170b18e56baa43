//! Settings pushed from the UI.

use serde::{Deserialize, Serialize};

/// Inference overrides supplied by the host page. Absent fields keep the
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceSettings {
    pub endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    /// `display` or `original`
    pub mask_resolution: Option<String>,
}

/// Viewport region available to the masking canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

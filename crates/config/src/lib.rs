//! Shared configuration for Erasure
//!
//! This crate provides the single source of truth for viewport dimensions,
//! brush limits, accepted uploads and the inference endpoint, shared by the
//! native build and the browser bridge.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default viewport width in logical pixels
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 960;

/// Default viewport height in logical pixels
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;

/// Smallest brush diameter in pixels
pub const MIN_BRUSH_SIZE: u32 = 20;

/// Largest brush diameter in pixels
pub const MAX_BRUSH_SIZE: u32 = 80;

/// Brush slider increment
pub const BRUSH_SIZE_STEP: u32 = 10;

/// Brush diameter after a reset
pub const DEFAULT_BRUSH_SIZE: u32 = MIN_BRUSH_SIZE;

/// Largest accepted upload (5 MiB)
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Guidance scale forwarded to the remote worker
pub const DEFAULT_GUIDANCE_SCALE: f32 = 2.5;

/// Sampling steps forwarded to the remote worker
pub const DEFAULT_STEPS: u32 = 60;

/// Endpoint used when nothing is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/runsync";

/// Viewport region available to the masking canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Available width in logical pixels
    pub width: u32,
    /// Available height in logical pixels
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Brush diameter limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrushConfig {
    pub min_size: u32,
    pub max_size: u32,
    pub step: u32,
    pub default_size: u32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_BRUSH_SIZE,
            max_size: MAX_BRUSH_SIZE,
            step: BRUSH_SIZE_STEP,
            default_size: DEFAULT_BRUSH_SIZE,
        }
    }
}

/// Upload acceptance rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLimits {
    /// Largest accepted file in bytes
    pub max_bytes: usize,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

/// Resolution the mask is encoded at before transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskResolution {
    /// Canvas (displayed, possibly downscaled) resolution
    #[default]
    Display,
    /// Natural resolution of the uploaded image
    Original,
}

impl MaskResolution {
    /// Case-insensitive `display` / `original`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "display" => Some(Self::Display),
            "original" => Some(Self::Original),
            _ => None,
        }
    }
}

/// Remote inference endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Full URL of the synchronous inference route
    pub endpoint: String,
    /// Bearer token sent with each request, if any
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Guidance scale forwarded verbatim
    pub scale: f32,
    /// Sampling steps forwarded verbatim
    pub step: u32,
    /// Client timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub mask_resolution: MaskResolution,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            scale: DEFAULT_GUIDANCE_SCALE,
            step: DEFAULT_STEPS,
            timeout_secs: None,
            mask_resolution: MaskResolution::Display,
        }
    }
}

impl InferenceConfig {
    /// Build from defaults overridden by `ERASURE_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (environment or otherwise)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup("ERASURE_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(key) = lookup("ERASURE_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(raw) = lookup("ERASURE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.timeout_secs = None,
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => warn!("Ignoring invalid ERASURE_TIMEOUT_SECS={raw:?}"),
            }
        }
        if let Some(raw) = lookup("ERASURE_MASK_RESOLUTION") {
            match MaskResolution::parse(&raw) {
                Some(resolution) => self.mask_resolution = resolution,
                None => warn!("Ignoring invalid ERASURE_MASK_RESOLUTION={raw:?}"),
            }
        }
        self
    }
}

/// Everything a session needs, in one place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErasureConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub brush: BrushConfig,
    #[serde(default)]
    pub limits: ImageLimits,
    #[serde(default)]
    pub inference: InferenceConfig,
}

impl ErasureConfig {
    /// Defaults with inference settings taken from the environment
    pub fn from_env() -> Self {
        Self {
            inference: InferenceConfig::from_env(),
            ..Self::default()
        }
    }
}

//! Session state reported back to the UI.

use serde::{Deserialize, Serialize};

use crate::commands::BrushMode;

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed { message: String },
}

/// Where the image sits inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryInfo {
    pub scale: f32,
    pub width: u32,
    pub height: u32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Snapshot of everything the wizard shell renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Wizard step index, 0..=5
    pub step: u8,
    pub step_label: String,
    pub has_image: bool,
    pub brush_size: u32,
    pub mode: BrushMode,
    pub stroke_count: usize,
    /// True while the exchange is in flight; the submit trigger is disabled
    pub busy: bool,
    pub submission: SubmissionStatus,
    pub geometry: Option<GeometryInfo>,
}

//! Mask command types for the masking canvas.

use serde::{Deserialize, Serialize};

use crate::input::PointerEvent;

/// Brush mode for mask strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    #[default]
    Paint,
    Erase,
}

/// Commands for controlling the masking canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MaskCommand {
    /// Pointer activity over the canvas
    Pointer(PointerEvent),
    /// Set brush diameter in pixels (clamped by the core)
    SetBrushSize { size: i64 },
    /// Switch between paint and erase
    SetMode { mode: BrushMode },
    /// Clear all strokes and restore the default brush
    Reset,
}

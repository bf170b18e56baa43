//! Pointer input events from the masking canvas.

use serde::{Deserialize, Serialize};

/// Pointer events in canvas pixel space (already offset and scaled by the UI).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
}


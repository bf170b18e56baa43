//! Command types for IPC messages.

mod mask;

pub use mask::*;

use serde::{Deserialize, Serialize};

/// Wizard navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardCommand {
    Next,
    Back,
    /// Jump straight to a step (clamped by the core)
    GoTo { step: i64 },
    /// Discard everything and start over
    Finish,
}

/// Image selection commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImageCommand {
    /// A file was dropped or picked; contents as standard base64
    Load { data: String },
    Remove,
}

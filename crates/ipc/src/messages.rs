//! Main IPC message enums for communication between the core and the UI.

use serde::{Deserialize, Serialize};

use crate::commands::{ImageCommand, MaskCommand, WizardCommand};
use crate::types::{GeometryInfo, InferenceSettings, SessionSnapshot, ViewportSize};

/// Messages from the core to the JavaScript UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoreToUi {
    /// Session state after any change
    StateChanged(SessionSnapshot),

    /// Composed canvas frame (image, mask, cursor) as a PNG data URL
    Frame {
        geometry: GeometryInfo,
        png_data_url: String,
    },

    /// Edited image returned by the worker, as a PNG data URL
    ResultReady { png_data_url: String },

    /// Error notification
    Error { code: String, message: String },
}

/// Messages from the JavaScript UI to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToCore {
    /// Override inference settings
    Configure(InferenceSettings),

    /// Available canvas region changed
    ResizeViewport(ViewportSize),

    /// Wizard navigation
    Wizard(WizardCommand),

    /// Image selection
    Image(ImageCommand),

    /// Mask drawing
    Mask(MaskCommand),

    /// Send image and mask to the worker
    Submit,

    /// Ask for a fresh frame and state snapshot
    Refresh,
}

impl UiToCore {
    /// Parse a message from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, crate::IpcError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl CoreToUi {
    /// Serialize a message to JSON text.
    pub fn to_json(&self) -> Result<String, crate::IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

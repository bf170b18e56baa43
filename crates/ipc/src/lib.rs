//! IPC message protocol for Erasure
//!
//! Defines the typed records exchanged with the JavaScript UI and with the
//! remote inference worker. Everything crossing a process or language
//! boundary is parsed into these types first, so malformed payloads fail
//! closed instead of leaking missing fields into the core.

mod commands;
mod error;
mod input;
mod messages;
mod types;

pub use commands::*;
pub use error::IpcError;
pub use input::*;
pub use messages::{CoreToUi, UiToCore};
pub use types::*;

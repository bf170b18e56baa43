//! Type definitions for IPC messages.

mod inference;
mod session;
mod settings;

pub use inference::*;
pub use session::*;
pub use settings::*;

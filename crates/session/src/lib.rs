//! Per-flow session state for the object-removal wizard
//!
//! A [`Session`] owns everything one pass through the wizard needs: the
//! current step, the uploaded image, the mask canvas drawn over it, and the
//! submission orchestrator. Hosts keep one session and drive it with the
//! operations below; there is no process-wide state.

mod error;
mod session;
mod upload;
mod wizard;

pub use error::SessionError;
pub use session::Session;
pub use upload::{LoadedImage, UploadFormat};
pub use wizard::WizardStep;

use erasure_inference::SubmitError;

/// Errors surfaced by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Upload is not PNG or JPEG
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Upload exceeds the size limit
    #[error("Image is too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// Upload claims a supported format but cannot be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl SessionError {
    /// Stable identifier reported to the UI
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::TooLarge { .. } => "too_large",
            Self::Decode(_) => "decode_failed",
            Self::Submit(err) => err.code(),
        }
    }
}

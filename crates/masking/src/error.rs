use thiserror::Error;

#[derive(Debug, Error)]
pub enum MaskError {
    #[error("Invalid mask dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Failed to encode mask: {0}")]
    Encode(#[from] image::ImageError),
}

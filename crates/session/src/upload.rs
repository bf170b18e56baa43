//! Uploaded image validation and ownership

use erasure_config::ImageLimits;
use image::{ImageFormat, RgbaImage};
use tracing::{debug, info};

use crate::SessionError;

/// Formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Png,
    Jpeg,
}

impl UploadFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// An accepted upload: the file as received plus its decoded preview.
///
/// The original bytes are what gets sent for inference. The preview is what
/// the canvas shows and may later be swapped for an edited result.
#[derive(Debug)]
pub struct LoadedImage {
    bytes: Vec<u8>,
    format: UploadFormat,
    original_size: (u32, u32),
    preview: RgbaImage,
}

impl LoadedImage {
    /// Sniff, size-check and decode an upload
    pub fn decode(bytes: Vec<u8>, limits: &ImageLimits) -> Result<Self, SessionError> {
        if bytes.len() > limits.max_bytes {
            return Err(SessionError::TooLarge {
                size: bytes.len(),
                limit: limits.max_bytes,
            });
        }

        let format = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => UploadFormat::Png,
            Ok(ImageFormat::Jpeg) => UploadFormat::Jpeg,
            Ok(other) => return Err(SessionError::UnsupportedFormat(format!("{other:?}"))),
            Err(_) => return Err(SessionError::UnsupportedFormat("unknown".to_string())),
        };

        let preview = image::load_from_memory_with_format(&bytes, format.image_format())
            .map_err(|e| SessionError::Decode(e.to_string()))?
            .to_rgba8();
        if preview.width() == 0 || preview.height() == 0 {
            return Err(SessionError::Decode("image has no pixels".to_string()));
        }

        info!(
            "Loaded {} image: {}x{} ({} bytes)",
            format.mime_type(),
            preview.width(),
            preview.height(),
            bytes.len()
        );

        Ok(Self {
            original_size: preview.dimensions(),
            bytes,
            format,
            preview,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> UploadFormat {
        self.format
    }

    /// Size of the uploaded file's pixels
    pub fn original_size(&self) -> (u32, u32) {
        self.original_size
    }

    /// Image currently shown to the user
    pub fn preview(&self) -> &RgbaImage {
        &self.preview
    }

    /// Size of the displayed image; drives the display geometry
    pub fn display_size(&self) -> (u32, u32) {
        self.preview.dimensions()
    }

    /// Show `result` in place of the current preview
    pub fn replace_preview(&mut self, result: RgbaImage) {
        debug!(
            "Replacing {}x{} preview with {}x{} result",
            self.preview.width(),
            self.preview.height(),
            result.width(),
            result.height()
        );
        self.preview = result;
    }
}

impl Drop for LoadedImage {
    fn drop(&mut self) {
        debug!(
            "Releasing {}x{} preview ({} bytes upload)",
            self.preview.width(),
            self.preview.height(),
            self.bytes.len()
        );
    }
}

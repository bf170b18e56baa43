//! Payload encoding and result decoding

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use erasure_config::{InferenceConfig, MaskResolution};
use erasure_ipc::{SubmissionRequest, SubmissionResponse};
use image::RgbaImage;
use masking::MaskBitmap;
use tracing::debug;

use crate::SubmitError;

/// Everything needed to build one request
#[derive(Debug, Clone, Copy)]
pub struct SubmissionInput<'a> {
    /// Uploaded file exactly as received
    pub original: Option<&'a [u8]>,
    /// Natural size of the uploaded image
    pub natural_size: (u32, u32),
    /// Rendered mask at canvas resolution
    pub mask: Option<&'a MaskBitmap>,
}

/// Validate the inputs and build the request body.
///
/// Fails with `MissingInput` when the original is absent or empty, or the
/// mask is absent or has nothing marked.
pub fn encode_request(
    input: SubmissionInput<'_>,
    config: &InferenceConfig,
) -> Result<SubmissionRequest, SubmitError> {
    let original = input
        .original
        .filter(|bytes| !bytes.is_empty())
        .ok_or(SubmitError::MissingInput("no image loaded"))?;
    let mask = input
        .mask
        .ok_or(SubmitError::MissingInput("no mask rendered"))?;
    if mask.is_empty() {
        return Err(SubmitError::MissingInput("mask has no marked pixels"));
    }

    let mask = match config.mask_resolution {
        MaskResolution::Display => mask.clone(),
        MaskResolution::Original => {
            let (width, height) = input.natural_size;
            mask.resized(width, height)
                .map_err(|e| SubmitError::Encode(e.to_string()))?
        }
    };
    let mask_png = mask.to_png().map_err(|e| SubmitError::Encode(e.to_string()))?;

    debug!(
        "encode_request: original={} bytes, mask={}x{} ({} bytes png, {} marked)",
        original.len(),
        mask.width(),
        mask.height(),
        mask_png.len(),
        mask.marked_count()
    );

    Ok(SubmissionRequest::new(
        STANDARD.encode(original),
        STANDARD.encode(&mask_png),
        config.scale,
        config.step,
    ))
}

/// Decode the edited image carried by a response
pub fn decode_result_image(response: &SubmissionResponse) -> Result<RgbaImage, SubmitError> {
    let encoded = response.output.result_image.trim();
    // Tolerate a data URL wrapper around the payload
    let encoded = match encoded.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => encoded,
    };

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| SubmitError::Decode(format!("result_image is not base64: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| SubmitError::Decode(format!("result_image is not an image: {e}")))?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use erasure_ipc::InferenceOutput;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    pub(crate) fn marked_mask(width: u32, height: u32) -> MaskBitmap {
        let mut mask = MaskBitmap::new(width, height);
        mask.set(0, 0, true);
        mask
    }

    pub(crate) fn response_with(image: &[u8]) -> SubmissionResponse {
        SubmissionResponse {
            id: None,
            status: Some("COMPLETED".to_string()),
            output: InferenceOutput {
                result_image: STANDARD.encode(image),
            },
        }
    }

    #[test]
    fn test_encode_request() {
        let original = png_bytes(4, 4);
        let mask = marked_mask(2, 2);
        let request = encode_request(
            SubmissionInput {
                original: Some(&original),
                natural_size: (4, 4),
                mask: Some(&mask),
            },
            &InferenceConfig::default(),
        )
        .unwrap();

        assert_eq!(STANDARD.decode(&request.input.original_image).unwrap(), original);
        assert_eq!(request.input.scale, 2.5);
        assert_eq!(request.input.step, 60);

        let mask_png = STANDARD.decode(&request.input.mask).unwrap();
        let decoded = image::load_from_memory(&mask_png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn test_encode_request_original_resolution() {
        let original = png_bytes(4, 4);
        let mask = marked_mask(2, 2);
        let config = InferenceConfig {
            mask_resolution: MaskResolution::Original,
            ..Default::default()
        };
        let request = encode_request(
            SubmissionInput {
                original: Some(&original),
                natural_size: (8, 6),
                mask: Some(&mask),
            },
            &config,
        )
        .unwrap();

        let mask_png = STANDARD.decode(&request.input.mask).unwrap();
        let decoded = image::load_from_memory(&mask_png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_missing_inputs() {
        let config = InferenceConfig::default();
        let original = png_bytes(2, 2);
        let mask = marked_mask(2, 2);
        let empty_mask = MaskBitmap::new(2, 2);

        let cases = [
            (None, Some(&mask)),
            (Some(&[][..]), Some(&mask)),
            (Some(&original[..]), None),
            (Some(&original[..]), Some(&empty_mask)),
        ];
        for (original, mask) in cases {
            let result = encode_request(
                SubmissionInput {
                    original,
                    natural_size: (2, 2),
                    mask,
                },
                &config,
            );
            assert!(matches!(result, Err(SubmitError::MissingInput(_))));
        }
    }

    #[test]
    fn test_decode_result_image() {
        let image = decode_result_image(&response_with(&png_bytes(3, 5))).unwrap();
        assert_eq!(image.dimensions(), (3, 5));
    }

    #[test]
    fn test_decode_result_data_url() {
        let mut response = response_with(&png_bytes(2, 2));
        response.output.result_image =
            format!("data:image/png;base64,{}", response.output.result_image);
        assert!(decode_result_image(&response).is_ok());
    }

    #[test]
    fn test_decode_result_rejects_garbage() {
        let mut response = response_with(b"not an image");
        assert!(matches!(decode_result_image(&response), Err(SubmitError::Decode(_))));

        response.output.result_image = "%%%".to_string();
        assert!(matches!(decode_result_image(&response), Err(SubmitError::Decode(_))));
    }
}

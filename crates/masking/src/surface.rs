//! Binary mask bitmap

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::MaskError;

/// Pixel value of a marked ("remove") pixel in exported images
pub const MARKED_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Pixel value of an unmarked pixel in exported images
pub const CLEAR_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A binary mask: each pixel is either marked for removal or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBitmap {
    width: u32,
    height: u32,
    /// Row-major coverage, one entry per pixel
    marked: Vec<bool>,
}

impl MaskBitmap {
    /// Create a fully unmarked bitmap
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            marked: vec![false; pixel_count],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Whether a pixel is marked. Out-of-bounds pixels are never marked.
    #[inline]
    pub fn is_marked(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.marked[i])
    }

    /// Mark or unmark a pixel. Does nothing if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, marked: bool) {
        if let Some(i) = self.index(x, y) {
            self.marked[i] = marked;
        }
    }

    /// Unmark every pixel
    pub fn clear(&mut self) {
        self.marked.fill(false);
    }

    /// Number of marked pixels
    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// Number of marked pixels inside `[x0, x1) x [y0, y1)`
    pub fn marked_in(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_marked(x, y))
            .count()
    }

    /// True when nothing is marked
    pub fn is_empty(&self) -> bool {
        !self.marked.iter().any(|m| *m)
    }

    /// Nearest-neighbour resample to another resolution
    pub fn resized(&self, width: u32, height: u32) -> Result<Self, MaskError> {
        if width == 0 || height == 0 || self.width == 0 || self.height == 0 {
            return Err(MaskError::InvalidDimensions { width, height });
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let mut out = Self::new(width, height);
        for y in 0..height {
            let sy = ((y as u64 * self.height as u64) / height as u64) as u32;
            for x in 0..width {
                let sx = ((x as u64 * self.width as u64) / width as u64) as u32;
                if self.is_marked(sx, sy) {
                    out.set(x, y, true);
                }
            }
        }
        Ok(out)
    }

    /// Export as RGBA: white opaque where marked, transparent elsewhere
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            if self.is_marked(x, y) {
                MARKED_PIXEL
            } else {
                CLEAR_PIXEL
            }
        })
    }

    /// Export as PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>, MaskError> {
        if self.width == 0 || self.height == 0 {
            return Err(MaskError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let mut bytes = Cursor::new(Vec::new());
        self.to_rgba_image().write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}

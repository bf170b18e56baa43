//! Fitting the image into the available viewport
//!
//! The image is never upscaled and is letterboxed in the centre of the
//! viewport. Geometry is derived data: recompute it whenever the image or
//! the viewport changes instead of storing it alongside either.

/// Placement of an image inside a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    /// `min(Vw / W, Vh / H, 1)`
    pub scale: f32,
    /// Rendered width, `W * scale`
    pub width: f32,
    /// Rendered height, `H * scale`
    pub height: f32,
    /// Horizontal centering offset
    pub offset_x: f32,
    /// Vertical centering offset
    pub offset_y: f32,
}

impl DisplayGeometry {
    /// Compute placement for a `natural_width x natural_height` image in a
    /// `viewport_width x viewport_height` region.
    ///
    /// Returns None when any dimension is zero.
    pub fn fit(
        natural_width: u32,
        natural_height: u32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Option<Self> {
        if natural_width == 0 || natural_height == 0 || viewport_width == 0 || viewport_height == 0
        {
            return None;
        }

        let (w, h) = (natural_width as f32, natural_height as f32);
        let (vw, vh) = (viewport_width as f32, viewport_height as f32);

        let scale = (vw / w).min(vh / h).min(1.0);
        let width = w * scale;
        let height = h * scale;

        Some(Self {
            scale,
            width,
            height,
            offset_x: (vw - width) / 2.0,
            offset_y: (vh - height) / 2.0,
        })
    }

    /// Canvas pixel dimensions: the rendered size rounded, at least 1x1
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }
}

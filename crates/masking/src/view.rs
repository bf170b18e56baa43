//! Composing the displayed frame: base image, mask overlay and brush cursor

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::brush::{BrushCursor, CURSOR_OPACITY};
use crate::canvas::MaskCanvas;
use crate::surface::MARKED_PIXEL;

/// Blend a color onto an existing pixel using alpha compositing
/// Formula: out = src * alpha + dst * (1 - alpha)
#[inline]
fn blend_pixel(dst: &mut Rgba<u8>, color: [u8; 3], opacity: f32) {
    let src_alpha = opacity.clamp(0.0, 1.0);
    let inv_src_alpha = 1.0 - src_alpha;
    let mix = |s: u8, d: u8| (s as f32 * src_alpha + d as f32 * inv_src_alpha).round() as u8;

    let dst_alpha = dst[3] as f32 / 255.0;
    *dst = Rgba([
        mix(color[0], dst[0]),
        mix(color[1], dst[1]),
        mix(color[2], dst[2]),
        ((src_alpha + dst_alpha * inv_src_alpha) * 255.0).round() as u8,
    ]);
}

fn draw_cursor(frame: &mut RgbaImage, cursor: &BrushCursor) {
    let reach = cursor.radius + 2.0;
    let x_min = (cursor.center.x - reach).floor().max(0.0) as u32;
    let y_min = (cursor.center.y - reach).floor().max(0.0) as u32;
    let x_max = ((cursor.center.x + reach).ceil().max(0.0) as u32).min(frame.width());
    let y_max = ((cursor.center.y + reach).ceil().max(0.0) as u32).min(frame.height());

    let color = cursor.color();
    for py in y_min..y_max {
        for px in x_min..x_max {
            if cursor.covers(px as f32 + 0.5, py as f32 + 0.5) {
                blend_pixel(frame.get_pixel_mut(px, py), color, CURSOR_OPACITY);
            }
        }
    }
}

impl MaskCanvas {
    /// Render the composed view at canvas resolution
    ///
    /// `base` is the displayed image; it is resampled when its size differs
    /// from the canvas. Marked pixels are drawn opaque white on top, then the
    /// cursor outline if the pointer is over the canvas.
    pub fn render_view(&self, base: &RgbaImage) -> RgbaImage {
        let mut frame = if base.dimensions() == (self.width(), self.height()) {
            base.clone()
        } else {
            imageops::resize(base, self.width(), self.height(), FilterType::Triangle)
        };

        let mask = self.render_mask_bitmap();
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            if mask.is_marked(x, y) {
                *pixel = MARKED_PIXEL;
            }
        }

        if let Some(cursor) = self.cursor() {
            draw_cursor(&mut frame, &cursor);
        }

        frame
    }
}

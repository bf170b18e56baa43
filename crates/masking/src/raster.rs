//! Stamping stroke geometry onto a mask bitmap
//!
//! A stroke is drawn as a polyline with round caps and joins: a pixel is
//! covered when its centre lies within the brush radius of any segment.
//! Coverage is hard-edged, so applying the same segment twice is a no-op.

use glam::Vec2;
use tracing::trace;

use crate::surface::MaskBitmap;
use crate::types::{Stroke, StrokeMode};

/// Apply a whole stroke to the bitmap using its mode's combine rule:
/// paint sets covered pixels, erase clears them.
pub fn apply_stroke(mask: &mut MaskBitmap, stroke: &Stroke) {
    let radius = stroke.radius();
    let marked = stroke.mode == StrokeMode::Paint;

    match stroke.points() {
        [] => {}
        [single] => {
            let p = single.to_vec2();
            apply_segment(mask, p, p, radius, marked);
        }
        points => {
            for pair in points.windows(2) {
                apply_segment(mask, pair[0].to_vec2(), pair[1].to_vec2(), radius, marked);
            }
        }
    }
}

/// Set every pixel whose centre is within `radius` of segment `a..b` to
/// `marked`. A zero-length segment stamps a disc.
///
/// Returns the bounding box of the affected region (x, y, width, height),
/// or None if the segment misses the bitmap.
pub fn apply_segment(
    mask: &mut MaskBitmap,
    a: Vec2,
    b: Vec2,
    radius: f32,
    marked: bool,
) -> Option<(u32, u32, u32, u32)> {
    if radius <= 0.0 || !radius.is_finite() || !a.is_finite() || !b.is_finite() {
        return None;
    }

    let lo = a.min(b) - Vec2::splat(radius);
    let hi = a.max(b) + Vec2::splat(radius);

    // Clamp to bitmap bounds
    let x_min = (lo.x.floor().max(0.0) as u32).min(mask.width());
    let y_min = (lo.y.floor().max(0.0) as u32).min(mask.height());
    let x_max = (hi.x.ceil().max(0.0) as u32).min(mask.width());
    let y_max = (hi.y.ceil().max(0.0) as u32).min(mask.height());

    if x_min >= x_max || y_min >= y_max {
        return None;
    }

    let radius_sq = radius * radius;
    for py in y_min..y_max {
        for px in x_min..x_max {
            let centre = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            if distance_sq_to_segment(centre, a, b) <= radius_sq {
                mask.set(px, py, marked);
            }
        }
    }

    trace!(
        "apply_segment: ({:.1}, {:.1}) -> ({:.1}, {:.1}), r={:.1}, marked={}",
        a.x, a.y, b.x, b.y, radius, marked
    );

    Some((x_min, y_min, x_max - x_min, y_max - y_min))
}

/// Squared distance from `p` to the closest point of segment `a..b`
#[inline]
pub fn distance_sq_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

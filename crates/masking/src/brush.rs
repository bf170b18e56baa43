//! Brush size limits and the live cursor indicator

use erasure_config::BrushConfig;

use crate::types::{Point, StrokeMode};

/// Brush diameter in pixels, always within the configured limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BrushSize(u32);

impl BrushSize {
    /// Clamp a requested size into `[min_size, max_size]` and snap it to the
    /// slider step. Ties round up. Out-of-range input is never rejected.
    pub fn clamped(requested: i64, limits: &BrushConfig) -> Self {
        let min = i64::from(limits.min_size);
        let max = i64::from(limits.max_size.max(limits.min_size));
        let value = requested.clamp(min, max);

        let step = i64::from(limits.step);
        let snapped = if step > 0 {
            min + (value - min + step / 2) / step * step
        } else {
            value
        };

        // Snapping can overshoot when the range is not a multiple of the step
        Self(snapped.min(max) as u32)
    }

    /// Default diameter after a reset
    pub fn default_for(limits: &BrushConfig) -> Self {
        Self::clamped(i64::from(limits.default_size), limits)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}

/// Active brush settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushState {
    pub size: BrushSize,
    pub mode: StrokeMode,
}

/// Dashed circle following the pointer, showing the brush footprint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushCursor {
    pub center: Point,
    pub radius: f32,
    pub mode: StrokeMode,
}

/// Length of each dash and gap along the cursor outline
pub const CURSOR_DASH: f32 = 4.0;

/// Outline thickness in pixels
pub const CURSOR_STROKE_WIDTH: f32 = 2.0;

/// Outline opacity
pub const CURSOR_OPACITY: f32 = 0.8;

impl BrushCursor {
    /// Outline color: blue while painting, red while erasing
    pub fn color(&self) -> [u8; 3] {
        match self.mode {
            StrokeMode::Paint => [0, 0, 255],
            StrokeMode::Erase => [255, 0, 0],
        }
    }

    /// Whether a pixel centre lies on a visible dash of the outline
    pub fn covers(&self, x: f32, y: f32) -> bool {
        let dx = x - self.center.x;
        let dy = y - self.center.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if (distance - self.radius).abs() > CURSOR_STROKE_WIDTH / 2.0 {
            return false;
        }

        // Arc length from the positive x axis, going clockwise in screen space
        let angle = dy.atan2(dx).rem_euclid(std::f32::consts::TAU);
        let arc = angle * self.radius;
        ((arc / CURSOR_DASH) as u32) % 2 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_size_clamps_high() {
        let limits = BrushConfig::default();
        assert_eq!(BrushSize::clamped(95, &limits).get(), 80);
        assert_eq!(BrushSize::clamped(i64::MAX, &limits).get(), 80);
    }

    #[test]
    fn test_brush_size_clamps_low() {
        let limits = BrushConfig::default();
        assert_eq!(BrushSize::clamped(5, &limits).get(), 20);
        assert_eq!(BrushSize::clamped(-40, &limits).get(), 20);
    }

    #[test]
    fn test_brush_size_snaps_to_step() {
        let limits = BrushConfig::default();
        assert_eq!(BrushSize::clamped(40, &limits).get(), 40);
        assert_eq!(BrushSize::clamped(44, &limits).get(), 40);
        assert_eq!(BrushSize::clamped(45, &limits).get(), 50);
        assert_eq!(BrushSize::clamped(79, &limits).get(), 80);
    }

    #[test]
    fn test_brush_size_default() {
        let limits = BrushConfig::default();
        assert_eq!(BrushSize::default_for(&limits).get(), 20);
    }

    #[test]
    fn test_brush_size_zero_step() {
        let limits = BrushConfig {
            step: 0,
            ..Default::default()
        };
        assert_eq!(BrushSize::clamped(33, &limits).get(), 33);
    }

    #[test]
    fn test_cursor_outline() {
        let cursor = BrushCursor {
            center: Point::new(50.0, 50.0),
            radius: 10.0,
            mode: StrokeMode::Paint,
        };

        // Start of the first dash on the +x axis
        assert!(cursor.covers(60.5, 50.0));
        // Centre and far outside are never drawn
        assert!(!cursor.covers(50.0, 50.0));
        assert!(!cursor.covers(80.0, 50.0));
        assert_eq!(cursor.color(), [0, 0, 255]);
    }
}

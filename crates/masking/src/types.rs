use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A position in canvas pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// How a stroke combines with the mask beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    /// Marks pixels for removal (union)
    #[default]
    Paint,
    /// Unmarks previously marked pixels (subtraction)
    Erase,
}

/// One continuous pointer drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Points in the order they were captured
    points: Vec<Point>,
    pub mode: StrokeMode,
    /// Brush diameter in canvas pixels, fixed when the stroke began
    pub diameter: f32,
}

impl Stroke {
    /// Start a stroke at a single point
    pub fn new(start: Point, mode: StrokeMode, diameter: f32) -> Self {
        Self {
            points: vec![start],
            mode,
            diameter,
        }
    }

    /// Append a point. A point equal to the last one is dropped so repeated
    /// pointer events leave the stroke unchanged.
    ///
    /// Returns whether the point was kept.
    pub fn push(&mut self, point: Point) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Scale every point and the diameter, used when the canvas is resized
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x * sx, p.y * sy))
                .collect(),
            mode: self.mode,
            diameter: self.diameter * (sx + sy) / 2.0,
        }
    }
}

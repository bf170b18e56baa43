//! Mask canvas state and its transitions
//!
//! The canvas owns the ordered stroke sequence. It is the only mutable
//! representation of the mask: the bitmap is always re-derived by
//! compositing strokes in insertion order, so later strokes override
//! earlier ones in the same region regardless of where they lie.
//!
//! All input goes through [`MaskCanvas::apply`], a transition from
//! `(canvas, event)` to the next canvas. The `&mut self` helpers below are
//! the same transitions for callers that keep the canvas in place.

use erasure_config::BrushConfig;
use tracing::debug;

use crate::brush::{BrushCursor, BrushSize, BrushState};
use crate::raster::apply_stroke;
use crate::surface::MaskBitmap;
use crate::types::{Point, Stroke, StrokeMode};

/// Input to the mask canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// Pointer pressed: start a stroke with the current brush
    Begin(Point),
    /// Pointer dragged
    Extend(Point),
    /// Pointer released
    End,
    /// Pointer moved (pressed or not); moves the cursor and extends any
    /// active stroke
    PointerMoved(Point),
    /// Pointer left the canvas; hides the cursor and ends any active stroke
    PointerLeft,
    SetBrushSize(i64),
    SetMode(StrokeMode),
    /// Clear all strokes and restore the default brush size
    Reset,
    /// Canvas pixel size changed
    Resize { width: u32, height: u32 },
}

/// Stroke sequence plus brush and cursor state for one loaded image
#[derive(Debug, Clone, PartialEq)]
pub struct MaskCanvas {
    width: u32,
    height: u32,
    /// Strokes in paint order
    strokes: Vec<Stroke>,
    /// True while the last stroke is still receiving points
    drawing: bool,
    brush: BrushState,
    cursor: Option<Point>,
    limits: BrushConfig,
}

impl MaskCanvas {
    /// Create an empty canvas of the given pixel size
    pub fn new(width: u32, height: u32, limits: BrushConfig) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            drawing: false,
            brush: BrushState {
                size: BrushSize::default_for(&limits),
                mode: StrokeMode::Paint,
            },
            cursor: None,
            limits,
        }
    }

    /// Apply one event and return the resulting canvas
    #[must_use]
    pub fn apply(mut self, event: CanvasEvent) -> Self {
        self.handle(event);
        self
    }

    /// Apply one event in place
    pub fn handle(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::Begin(point) => {
                self.cursor = Some(point);
                self.begin_stroke(point, self.brush.mode, self.brush.size);
            }
            CanvasEvent::Extend(point) => self.extend_stroke(point),
            CanvasEvent::End => self.end_stroke(),
            CanvasEvent::PointerMoved(point) => {
                self.cursor = Some(point);
                self.extend_stroke(point);
            }
            CanvasEvent::PointerLeft => {
                self.cursor = None;
                self.end_stroke();
            }
            CanvasEvent::SetBrushSize(size) => self.set_brush_size(size),
            CanvasEvent::SetMode(mode) => self.set_mode(mode),
            CanvasEvent::Reset => self.reset_mask(),
            CanvasEvent::Resize { width, height } => self.rescale(width, height),
        }
    }

    /// Start a new stroke containing a single point
    ///
    /// A stroke that is still active is finished first.
    pub fn begin_stroke(&mut self, point: Point, mode: StrokeMode, size: BrushSize) {
        if self.drawing {
            self.end_stroke();
        }
        debug!(
            "begin_stroke: #{} at ({:.1}, {:.1}), mode={:?}, size={}",
            self.strokes.len(),
            point.x,
            point.y,
            mode,
            size.get()
        );
        self.strokes.push(Stroke::new(point, mode, size.as_f32()));
        self.drawing = true;
    }

    /// Append a point to the active stroke; no-op when nothing is active
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Finish the active stroke; it is immutable from here on
    pub fn end_stroke(&mut self) {
        if !self.drawing {
            return;
        }
        self.drawing = false;
        if let Some(stroke) = self.strokes.last() {
            debug!(
                "end_stroke: #{} with {} points",
                self.strokes.len() - 1,
                stroke.points().len()
            );
        }
    }

    /// Drop every stroke and restore the default brush size
    pub fn reset_mask(&mut self) {
        debug!("reset_mask: clearing {} strokes", self.strokes.len());
        self.strokes.clear();
        self.drawing = false;
        self.brush.size = BrushSize::default_for(&self.limits);
    }

    /// Set the brush size, clamped into the configured range
    pub fn set_brush_size(&mut self, requested: i64) {
        self.brush.size = BrushSize::clamped(requested, &self.limits);
    }

    pub fn set_mode(&mut self, mode: StrokeMode) {
        self.brush.mode = mode;
    }

    /// Resize the canvas, scaling recorded strokes so they stay aligned with
    /// the displayed image
    pub fn rescale(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        let sx = width as f32 / self.width.max(1) as f32;
        let sy = height as f32 / self.height.max(1) as f32;
        debug!(
            "rescale: {}x{} -> {}x{} ({} strokes)",
            self.width,
            self.height,
            width,
            height,
            self.strokes.len()
        );

        self.strokes = self.strokes.iter().map(|s| s.scaled(sx, sy)).collect();
        self.cursor = self.cursor.map(|c| Point::new(c.x * sx, c.y * sy));
        self.width = width;
        self.height = height;
    }

    /// Composite every stroke, in sequence order, into a fresh bitmap
    pub fn render_mask_bitmap(&self) -> MaskBitmap {
        let mut mask = MaskBitmap::new(self.width, self.height);
        for stroke in &self.strokes {
            apply_stroke(&mut mask, stroke);
        }
        mask
    }

    /// Live cursor indicator, if the pointer is over the canvas
    pub fn cursor(&self) -> Option<BrushCursor> {
        self.cursor.map(|center| BrushCursor {
            center,
            radius: self.brush.size.as_f32() / 2.0,
            mode: self.brush.mode,
        })
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
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[inline]
    pub fn brush_size(&self) -> BrushSize {
        self.brush.size
    }

    #[inline]
    pub fn mode(&self) -> StrokeMode {
        self.brush.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> MaskCanvas {
        MaskCanvas::new(200, 200, BrushConfig::default())
    }

    fn drag(canvas: MaskCanvas, from: Point, to: Point) -> MaskCanvas {
        canvas
            .apply(CanvasEvent::Begin(from))
            .apply(CanvasEvent::PointerMoved(to))
            .apply(CanvasEvent::End)
    }

    #[test]
    fn test_canvas_creation() {
        let canvas = canvas();
        assert_eq!(canvas.width(), 200);
        assert_eq!(canvas.brush_size().get(), 20);
        assert_eq!(canvas.mode(), StrokeMode::Paint);
        assert!(canvas.render_mask_bitmap().is_empty());
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut canvas = canvas();
        canvas.begin_stroke(
            Point::new(10.0, 10.0),
            StrokeMode::Paint,
            BrushSize::clamped(40, &BrushConfig::default()),
        );
        assert!(canvas.is_drawing());

        canvas.extend_stroke(Point::new(20.0, 10.0));
        canvas.extend_stroke(Point::new(20.0, 10.0));
        canvas.end_stroke();
        assert!(!canvas.is_drawing());

        let stroke = &canvas.strokes()[0];
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.diameter, 40.0);

        // Finished strokes no longer grow
        canvas.extend_stroke(Point::new(90.0, 90.0));
        assert_eq!(canvas.strokes()[0].points().len(), 2);
    }

    #[test]
    fn test_extend_without_active_stroke_is_noop() {
        let before = canvas();
        let after = before.clone().apply(CanvasEvent::Extend(Point::new(5.0, 5.0)));
        assert!(after.strokes().is_empty());
        // Cursor moves but nothing is drawn
        let after = after.apply(CanvasEvent::PointerMoved(Point::new(5.0, 5.0)));
        assert!(after.strokes().is_empty());
        assert!(after.cursor().is_some());
    }

    #[test]
    fn test_pointer_left_ends_stroke_and_hides_cursor() {
        let canvas = canvas()
            .apply(CanvasEvent::Begin(Point::new(10.0, 10.0)))
            .apply(CanvasEvent::PointerLeft)
            .apply(CanvasEvent::Extend(Point::new(50.0, 50.0)));

        assert!(!canvas.is_drawing());
        assert!(canvas.cursor().is_none());
        assert_eq!(canvas.strokes()[0].points().len(), 1);
    }

    #[test]
    fn test_stroke_keeps_brush_of_its_start() {
        let canvas = canvas()
            .apply(CanvasEvent::SetBrushSize(60))
            .apply(CanvasEvent::Begin(Point::new(10.0, 10.0)))
            .apply(CanvasEvent::SetBrushSize(20))
            .apply(CanvasEvent::SetMode(StrokeMode::Erase))
            .apply(CanvasEvent::End);

        assert_eq!(canvas.strokes()[0].diameter, 60.0);
        assert_eq!(canvas.strokes()[0].mode, StrokeMode::Paint);
        assert_eq!(canvas.mode(), StrokeMode::Erase);
    }

    #[test]
    fn test_brush_size_clamped() {
        let canvas = canvas().apply(CanvasEvent::SetBrushSize(95));
        assert_eq!(canvas.brush_size().get(), 80);
        let canvas = canvas.apply(CanvasEvent::SetBrushSize(5));
        assert_eq!(canvas.brush_size().get(), 20);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let events = [
            CanvasEvent::SetBrushSize(50),
            CanvasEvent::Begin(Point::new(20.0, 20.0)),
            CanvasEvent::PointerMoved(Point::new(120.0, 40.0)),
            CanvasEvent::PointerMoved(Point::new(150.0, 160.0)),
            CanvasEvent::End,
            CanvasEvent::SetMode(StrokeMode::Erase),
            CanvasEvent::Begin(Point::new(100.0, 30.0)),
            CanvasEvent::PointerMoved(Point::new(140.0, 120.0)),
            CanvasEvent::End,
        ];

        let replay = || events.iter().fold(canvas(), |c, e| c.apply(*e));
        let first = replay().render_mask_bitmap();
        let second = replay().render_mask_bitmap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_erase_after_paint_clears_region() {
        let a = Point::new(50.0, 100.0);
        let b = Point::new(150.0, 100.0);

        let painted = drag(canvas(), a, b);
        let mask = painted.render_mask_bitmap();
        assert!(mask.marked_in(40, 90, 160, 110) > 0);

        let erased = drag(painted.apply(CanvasEvent::SetMode(StrokeMode::Erase)), a, b);
        let mask = erased.render_mask_bitmap();
        assert_eq!(mask.marked_in(0, 0, 200, 200), 0);
    }

    #[test]
    fn test_paint_after_erase_remarks_region() {
        let a = Point::new(50.0, 100.0);
        let b = Point::new(150.0, 100.0);

        let canvas = drag(canvas(), a, b);
        let first = canvas.render_mask_bitmap();
        let canvas = drag(canvas.apply(CanvasEvent::SetMode(StrokeMode::Erase)), a, b);
        let canvas = drag(canvas.apply(CanvasEvent::SetMode(StrokeMode::Paint)), a, b);

        assert_eq!(canvas.render_mask_bitmap(), first);
    }

    #[test]
    fn test_composition_is_order_dependent() {
        let a = Point::new(100.0, 100.0);

        let paint_then_erase = drag(canvas(), a, a)
            .apply(CanvasEvent::SetMode(StrokeMode::Erase));
        let paint_then_erase = drag(paint_then_erase, a, a).render_mask_bitmap();

        let erase_then_paint = drag(canvas().apply(CanvasEvent::SetMode(StrokeMode::Erase)), a, a)
            .apply(CanvasEvent::SetMode(StrokeMode::Paint));
        let erase_then_paint = drag(erase_then_paint, a, a).render_mask_bitmap();

        assert!(paint_then_erase.is_empty());
        assert!(!erase_then_paint.is_empty());
    }

    #[test]
    fn test_erase_only_removes_overlap() {
        let canvas = drag(
            canvas().apply(CanvasEvent::SetBrushSize(20)),
            Point::new(20.0, 50.0),
            Point::new(180.0, 50.0),
        )
        .apply(CanvasEvent::SetMode(StrokeMode::Erase));
        let canvas = drag(canvas, Point::new(100.0, 20.0), Point::new(100.0, 80.0));
        let mask = canvas.render_mask_bitmap();

        assert!(!mask.is_marked(100, 50));
        assert!(mask.is_marked(30, 50));
        assert!(mask.is_marked(170, 50));
    }

    #[test]
    fn test_reset_clears_everything() {
        let canvas = drag(
            canvas().apply(CanvasEvent::SetBrushSize(70)),
            Point::new(10.0, 10.0),
            Point::new(190.0, 190.0),
        )
        .apply(CanvasEvent::SetMode(StrokeMode::Erase))
        .apply(CanvasEvent::Reset);

        assert!(canvas.strokes().is_empty());
        assert!(canvas.render_mask_bitmap().is_empty());
        assert_eq!(canvas.brush_size().get(), 20);
        assert_eq!(canvas.mode(), StrokeMode::Erase);
    }

    #[test]
    fn test_rescale_keeps_alignment() {
        let canvas = drag(canvas(), Point::new(100.0, 100.0), Point::new(100.0, 100.0))
            .apply(CanvasEvent::Resize {
                width: 100,
                height: 100,
            });

        assert_eq!((canvas.width(), canvas.height()), (100, 100));
        let stroke = &canvas.strokes()[0];
        assert_eq!(stroke.points()[0], Point::new(50.0, 50.0));
        assert_eq!(stroke.diameter, 10.0);
        assert!(canvas.render_mask_bitmap().is_marked(50, 50));
    }

    #[test]
    fn test_rescale_ignores_zero_size() {
        let canvas = canvas().apply(CanvasEvent::Resize { width: 0, height: 10 });
        assert_eq!((canvas.width(), canvas.height()), (200, 200));
    }

    #[test]
    fn test_begin_while_drawing_finishes_previous() {
        let canvas = canvas()
            .apply(CanvasEvent::Begin(Point::new(10.0, 10.0)))
            .apply(CanvasEvent::Begin(Point::new(50.0, 50.0)))
            .apply(CanvasEvent::PointerMoved(Point::new(60.0, 50.0)));

        assert_eq!(canvas.strokes().len(), 2);
        assert_eq!(canvas.strokes()[0].points().len(), 1);
        assert_eq!(canvas.strokes()[1].points().len(), 2);
    }

    #[test]
    fn test_cursor_tracks_brush() {
        let canvas = canvas()
            .apply(CanvasEvent::SetBrushSize(60))
            .apply(CanvasEvent::SetMode(StrokeMode::Erase))
            .apply(CanvasEvent::PointerMoved(Point::new(30.0, 40.0)));

        let cursor = canvas.cursor().unwrap();
        assert_eq!(cursor.center, Point::new(30.0, 40.0));
        assert_eq!(cursor.radius, 30.0);
        assert_eq!(cursor.mode, StrokeMode::Erase);
    }
}

//! The session context object

use erasure_config::{ErasureConfig, InferenceConfig, MaskResolution};
use erasure_inference::{
    InferenceBackend, SubmissionInput, SubmissionOrchestrator, SubmissionState, SubmissionTicket,
    SubmitError,
};
use erasure_ipc::{
    BrushMode, GeometryInfo, InferenceSettings, MaskCommand, PointerEvent, SessionSnapshot,
    SubmissionRequest, SubmissionResponse, SubmissionStatus, WizardCommand,
};
use image::RgbaImage;
use masking::{CanvasEvent, DisplayGeometry, MaskCanvas, Point, StrokeMode};
use tracing::{debug, info, warn};

use crate::upload::LoadedImage;
use crate::wizard::WizardStep;
use crate::SessionError;

/// All state for one pass through the wizard
#[derive(Debug)]
pub struct Session {
    config: ErasureConfig,
    step: WizardStep,
    viewport: (u32, u32),
    image: Option<LoadedImage>,
    /// Present exactly when `image` is
    canvas: Option<MaskCanvas>,
    orchestrator: SubmissionOrchestrator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ErasureConfig::default())
    }
}

impl Session {
    pub fn new(config: ErasureConfig) -> Self {
        let viewport = (config.display.width, config.display.height);
        let orchestrator = SubmissionOrchestrator::new(config.inference.clone());
        Self {
            config,
            step: WizardStep::Welcome,
            viewport,
            image: None,
            canvas: None,
            orchestrator,
        }
    }

    pub fn config(&self) -> &ErasureConfig {
        &self.config
    }

    /// Swap inference settings; takes effect on the next submission
    pub fn set_inference_config(&mut self, inference: InferenceConfig) {
        info!("Inference endpoint set to {}", inference.endpoint);
        self.orchestrator.set_config(inference.clone());
        self.config.inference = inference;
    }

    /// Apply settings sent by the host page over the current ones
    pub fn configure(&mut self, settings: InferenceSettings) {
        let mut inference = self.config.inference.clone();
        if let Some(endpoint) = settings.endpoint.filter(|e| !e.trim().is_empty()) {
            inference.endpoint = endpoint.trim().to_string();
        }
        if let Some(key) = settings.api_key {
            inference.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(secs) = settings.timeout_secs {
            inference.timeout_secs = (secs > 0).then_some(secs);
        }
        if let Some(raw) = settings.mask_resolution {
            match MaskResolution::parse(&raw) {
                Some(resolution) => inference.mask_resolution = resolution,
                None => warn!("Ignoring unknown mask resolution {raw:?}"),
            }
        }
        self.set_inference_config(inference);
    }

    // --- Wizard navigation ---

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn next_step(&mut self) {
        self.set_step(self.step.next());
    }

    pub fn prev_step(&mut self) {
        self.set_step(self.step.prev());
    }

    /// Jump to any step; out-of-range indices are clamped
    pub fn go_to_step(&mut self, index: i64) {
        self.set_step(WizardStep::clamped(index));
    }

    fn set_step(&mut self, step: WizardStep) {
        if step != self.step {
            debug!("Wizard step {:?} -> {:?}", self.step, step);
        }
        self.step = step;
        if step == WizardStep::Welcome {
            self.canvas_event(CanvasEvent::Reset);
        }
    }

    pub fn handle_wizard(&mut self, command: WizardCommand) {
        match command {
            WizardCommand::Next => self.next_step(),
            WizardCommand::Back => self.prev_step(),
            WizardCommand::GoTo { step } => self.go_to_step(step),
            WizardCommand::Finish => self.finish(),
        }
    }

    // --- Image ---

    /// Accept an upload, replacing any previous image and its mask
    pub fn load_image(&mut self, bytes: Vec<u8>) -> Result<(), SessionError> {
        let loaded = LoadedImage::decode(bytes, &self.config.limits)?;

        // Brush settings survive a new image; strokes do not
        let previous = self.canvas.as_ref().map(|c| (c.brush_size(), c.mode()));
        let mut canvas = self.canvas_for(loaded.display_size());
        if let Some((size, mode)) = previous {
            canvas.set_brush_size(size.get() as i64);
            canvas.set_mode(mode);
        }

        if self.orchestrator.is_submitting() {
            warn!("New image loaded while a submission is in flight; its result will be dropped");
        }
        self.orchestrator.reset();
        self.canvas = Some(canvas);
        self.image = Some(loaded);
        Ok(())
    }

    pub fn remove_image(&mut self) {
        if self.image.take().is_some() {
            info!("Image removed");
        }
        self.canvas = None;
        self.orchestrator.reset();
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    /// Placement of the displayed image in the viewport
    pub fn geometry(&self) -> Option<DisplayGeometry> {
        let (width, height) = self.image.as_ref()?.display_size();
        DisplayGeometry::fit(width, height, self.viewport.0, self.viewport.1)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Track the region available for the image; the mask follows
    pub fn resize_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring empty viewport {width}x{height}");
            return;
        }
        self.viewport = (width, height);
        if let Some((canvas_width, canvas_height)) = self.geometry().map(|g| g.canvas_size()) {
            self.canvas_event(CanvasEvent::Resize {
                width: canvas_width,
                height: canvas_height,
            });
        }
    }

    fn canvas_for(&self, display_size: (u32, u32)) -> MaskCanvas {
        let (width, height) =
            DisplayGeometry::fit(display_size.0, display_size.1, self.viewport.0, self.viewport.1)
                .map_or(display_size, |g| g.canvas_size());
        MaskCanvas::new(width, height, self.config.brush)
    }

    // --- Mask ---

    pub fn mask_canvas(&self) -> Option<&MaskCanvas> {
        self.canvas.as_ref()
    }

    fn canvas_event(&mut self, event: CanvasEvent) {
        match self.canvas.as_mut() {
            Some(canvas) => canvas.handle(event),
            None => debug!("No image loaded, ignoring {event:?}"),
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let event = match event {
            PointerEvent::Down { x, y } => CanvasEvent::Begin(Point::new(x, y)),
            PointerEvent::Move { x, y } => CanvasEvent::PointerMoved(Point::new(x, y)),
            PointerEvent::Up => CanvasEvent::End,
            PointerEvent::Leave => CanvasEvent::PointerLeft,
        };
        self.canvas_event(event);
    }

    pub fn set_brush_size(&mut self, size: i64) {
        self.canvas_event(CanvasEvent::SetBrushSize(size));
    }

    pub fn set_mode(&mut self, mode: StrokeMode) {
        self.canvas_event(CanvasEvent::SetMode(mode));
    }

    pub fn reset_mask(&mut self) {
        self.canvas_event(CanvasEvent::Reset);
    }

    pub fn handle_mask(&mut self, command: MaskCommand) {
        match command {
            MaskCommand::Pointer(event) => self.handle_pointer(event),
            MaskCommand::SetBrushSize { size } => self.set_brush_size(size),
            MaskCommand::SetMode { mode } => self.set_mode(stroke_mode(mode)),
            MaskCommand::Reset => self.reset_mask(),
        }
    }

    /// Displayed image with mask overlay and cursor, at canvas resolution
    pub fn render_frame(&self) -> Option<RgbaImage> {
        let image = self.image.as_ref()?;
        let canvas = self.canvas.as_ref()?;
        Some(canvas.render_view(image.preview()))
    }

    // --- Submission ---

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_submitting()
    }

    pub fn submission_state(&self) -> &SubmissionState {
        self.orchestrator.state()
    }

    /// Validate and encode the current image and mask, then move to
    /// `Processing`. On error the step is unchanged.
    ///
    /// The ticket must be handed back to [`Session::complete_submission`].
    pub fn begin_submission(
        &mut self,
    ) -> Result<(SubmissionTicket, SubmissionRequest), SessionError> {
        let mask = self.canvas.as_ref().map(MaskCanvas::render_mask_bitmap);
        let input = SubmissionInput {
            original: self.image.as_ref().map(LoadedImage::bytes),
            natural_size: self
                .image
                .as_ref()
                .map_or((0, 0), LoadedImage::original_size),
            mask: mask.as_ref(),
        };

        let (ticket, request) = self.orchestrator.prepare(input)?;
        self.set_step(WizardStep::Processing);
        Ok((ticket, request))
    }

    /// Apply the outcome of the exchange and move to `FinalResult`.
    ///
    /// Success shows the edited image and clears the mask; failure leaves
    /// the displayed image as it was. Returns `Ok(false)` when `ticket` was
    /// superseded by a reset or a later submission: the outcome is dropped
    /// and the session is untouched.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        outcome: Result<SubmissionResponse, SubmitError>,
    ) -> Result<bool, SessionError> {
        if !self.orchestrator.is_current(ticket) {
            debug!("Ignoring outcome of superseded submission {ticket:?}");
            return Ok(false);
        }

        let result = self.orchestrator.complete(ticket, outcome);
        self.set_step(WizardStep::FinalResult);
        let edited = result?;

        let mode = self.canvas.as_ref().map(MaskCanvas::mode);
        match self.image.as_mut() {
            Some(image) => image.replace_preview(edited),
            None => {
                warn!("Submission succeeded but the image was removed");
                return Ok(false);
            }
        }

        let display_size = self
            .image
            .as_ref()
            .map_or((0, 0), LoadedImage::display_size);
        let mut canvas = self.canvas_for(display_size);
        if let Some(mode) = mode {
            canvas.set_mode(mode);
        }
        self.canvas = Some(canvas);
        Ok(true)
    }

    /// Submit the current image and mask through `backend`
    pub async fn submit<B: InferenceBackend>(&mut self, backend: &B) -> Result<(), SessionError> {
        let (ticket, request) = self.begin_submission()?;
        let outcome = backend.infer(request).await;
        self.complete_submission(ticket, outcome).map(|_| ())
    }

    /// Start over: step 0, no image, empty mask, default brush.
    /// Configuration and viewport are kept, and so is the submission
    /// counter, so tickets issued before this call stay stale.
    pub fn finish(&mut self) {
        info!("Session finished, starting over");
        let previous = std::mem::take(self);
        let mut orchestrator = previous.orchestrator;
        orchestrator.reset();
        *self = Self {
            viewport: previous.viewport,
            orchestrator,
            ..Self::new(previous.config)
        };
    }

    /// Serializable summary for the UI
    pub fn snapshot(&self) -> SessionSnapshot {
        let canvas = self.canvas.as_ref();
        SessionSnapshot {
            step: self.step.index(),
            step_label: self.step.label().to_string(),
            has_image: self.image.is_some(),
            brush_size: canvas.map_or(self.config.brush.default_size, |c| c.brush_size().get()),
            mode: brush_mode(canvas.map_or(StrokeMode::Paint, MaskCanvas::mode)),
            stroke_count: canvas.map_or(0, |c| c.strokes().len()),
            busy: self.is_busy(),
            submission: match self.orchestrator.state() {
                SubmissionState::Idle => SubmissionStatus::Idle,
                SubmissionState::Submitting => SubmissionStatus::Submitting,
                SubmissionState::Succeeded => SubmissionStatus::Succeeded,
                SubmissionState::Failed { message, .. } => SubmissionStatus::Failed {
                    message: message.clone(),
                },
            },
            geometry: self.geometry().map(|g| GeometryInfo {
                scale: g.scale,
                width: g.width.round() as u32,
                height: g.height.round() as u32,
                offset_x: g.offset_x,
                offset_y: g.offset_y,
            }),
        }
    }
}

fn stroke_mode(mode: BrushMode) -> StrokeMode {
    match mode {
        BrushMode::Paint => StrokeMode::Paint,
        BrushMode::Erase => StrokeMode::Erase,
    }
}

fn brush_mode(mode: StrokeMode) -> BrushMode {
    match mode {
        StrokeMode::Paint => BrushMode::Paint,
        StrokeMode::Erase => BrushMode::Erase,
    }
}

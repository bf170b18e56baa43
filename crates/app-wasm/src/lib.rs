//! Erasure WASM build
//!
//! Compiles the wizard core to WebAssembly for the browser. The page's UI
//! talks to it through CustomEvents (see [`bridge`]) and may draw the live
//! mask canvas straight into a `<canvas>` with [`render_to_canvas`].

use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod dispatch;
mod logging;

/// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    logging::init(tracing::Level::INFO);
    bridge::init_bridge()?;
    bridge::receive(erasure_ipc::UiToCore::Refresh);
    Ok(())
}

/// Draw the current frame (image, mask overlay, brush cursor) into `canvas`,
/// resizing the element to the frame. Returns false when no image is loaded.
#[wasm_bindgen]
pub fn render_to_canvas(canvas: &web_sys::HtmlCanvasElement) -> Result<bool, JsValue> {
    let Some(frame) = bridge::with_session(|session| session.render_frame()) else {
        return Ok(false);
    };

    let (width, height) = frame.dimensions();
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| js_sys::Error::new("2d context unavailable"))?
        .dyn_into::<web_sys::CanvasRenderingContext2d>()?;
    let data = web_sys::ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(frame.as_raw()),
        width,
        height,
    )?;
    context.put_image_data(&data, 0.0, 0.0)?;
    Ok(true)
}

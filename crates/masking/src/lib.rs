//! Erasure masking system - stroke capture and mask compositing
//!
//! This crate provides the mask canvas controller:
//! - [`types::Stroke`] - One pointer drag with its mode and brush diameter
//! - [`brush`] - Brush size limits and the live cursor indicator
//! - [`geometry`] - Fitting the image into the available viewport
//! - [`surface`] - Binary mask bitmap
//! - [`raster`] - Stamping stroke segments onto the bitmap
//! - [`canvas`] - Stroke sequence state and its transitions
//! - [`view`] - Composing image, mask and cursor into one frame

pub mod brush;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod surface;
pub mod types;
pub mod view;

pub use brush::*;
pub use canvas::*;
pub use error::*;
pub use geometry::*;
pub use surface::*;
pub use types::*;

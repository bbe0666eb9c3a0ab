//! Half-size reduction and multi-scale canvas composition.
//!
//! Drop-odd policy:
//! - Half-size output is `(src.width() / 2, src.height() / 2)`.
//! - If source width or height is odd, the last column/row is dropped.
//!
//! Representational meaning:
//! - Each destination pixel is the arithmetic mean of one 2x2 source block.
//! - [`scaled::generate_scaled_images`] lays levels 1, 1/2, 1/4, 1/8 side by
//!   side, bottom-aligned, on one canvas.

mod downsample;
pub mod scaled;

pub use downsample::downsample2x2_mean_f32;
pub use scaled::{
    Canvas, CanvasLayout, DEFAULT_LEVELS, HalfSize, Placement, Reducer, ScaledCanvas,
    canvas_layout, generate_scaled_images, generate_scaled_images_with, scale_levels,
};

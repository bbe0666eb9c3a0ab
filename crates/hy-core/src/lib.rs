//! Foundational primitives for the hybrid-images workspace.
//!
//! ## Planes and Views
//! [`Image<f32>`] is the single-channel plane every filter operates on. Images
//! are contiguous and row-major. Borrowed views use element stride (not byte
//! stride): `stride` is the distance, in elements, between adjacent row starts
//! and may be greater than `width`, which allows subviews into a larger
//! canvas.
//!
//! ## Color Images
//! [`ColorImage`] groups 1 to 4 planes of the same size. Arithmetic and
//! [`PlaneProcessor`]s are applied per channel.
//!
//! ## Coordinates
//! Pixel access is `(x, y)` with `x` the column and `y` the row, origin at the
//! top-left corner.

mod arith;
mod color;
mod draw;
mod error;
mod image;

pub use arith::{add, add_inplace, add_scalar_inplace, subtract, subtract_inplace};
pub use color::{ColorImage, MAX_CHANNELS, PlaneProcessor};
pub use draw::blit;
pub use error::Error;
pub use image::{Image, ImageView, ImageViewMut, to_f32_unit, to_u8_clamped};

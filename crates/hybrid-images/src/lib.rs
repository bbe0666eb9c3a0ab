//! Umbrella crate for the `hybrid-images` workspace.
//!
//! Re-exports the plane and color image types, the Gaussian convolution, the
//! hybrid composition and the scale canvas so that callers need a single
//! dependency.

pub use hy_conv::*;
pub use hy_core::*;
pub use hy_hybrid::*;
pub use hy_pyr::*;

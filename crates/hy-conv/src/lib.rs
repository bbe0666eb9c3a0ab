//! 2D convolution and Gaussian kernels.
//!
//! Conventions:
//! - Kernels are dense and row-major; [`Kernel2D`] construction rejects empty
//!   or ragged input, so the convolution routines never see a malformed
//!   kernel.
//! - [`conv2d::convolve`] is true convolution (the kernel is rotated by 180
//!   degrees) with zero padding outside the image.
//! - Gaussian kernels are square with side `floor(8*sigma + 1)` rounded up to
//!   the next odd number, normalized to unit sum.
//!
//! Enable the `parallel` feature for a rayon-backed row-parallel pass.

pub mod conv2d;
pub mod kernels;

#[cfg(feature = "parallel")]
pub use conv2d::convolve_par;
pub use conv2d::{Convolution, convolve, convolve_inplace, convolve_into};
pub use kernels::{Kernel2D, gaussian_kernel, gaussian_size};

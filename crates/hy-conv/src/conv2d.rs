use hy_core::{Error, Image, ImageView, PlaneProcessor};

use crate::kernels::{Kernel2D, gaussian_kernel};

/// True 2D convolution with zero padding.
///
/// The kernel is rotated by 180 degrees before it is slid over the image, so
/// a non-symmetric kernel behaves as convolution rather than correlation. The
/// window for output `(x, y)` is anchored at `(x - kw/2, y - kh/2)` (floor),
/// which biases even-sized kernels toward the bottom/right. Source samples
/// outside the image read as `0`.
pub fn convolve(src: &ImageView<'_, f32>, kernel: &Kernel2D) -> Image<f32> {
    let mut out = Image::new_fill(src.width(), src.height(), 0.0f32);
    convolve_rows(src, &kernel.flipped(), 0, out.data_mut());
    out
}

/// Like [`convolve`], writing into a caller-owned buffer of the same size.
pub fn convolve_into(
    src: &ImageView<'_, f32>,
    kernel: &Kernel2D,
    dst: &mut Image<f32>,
) -> Result<(), Error> {
    if dst.dims() != src.dims() {
        return Err(Error::DimensionMismatch {
            expected: src.dims(),
            actual: dst.dims(),
        });
    }
    convolve_rows(src, &kernel.flipped(), 0, dst.data_mut());
    Ok(())
}

/// Convolves `plane` in place.
///
/// A snapshot of the input is taken first; every read during the pass comes
/// from the snapshot, never from partially written output.
pub fn convolve_inplace(plane: &mut Image<f32>, kernel: &Kernel2D) {
    let snapshot = plane.clone();
    convolve_rows(&snapshot.as_view(), &kernel.flipped(), 0, plane.data_mut());
}

/// Row-parallel [`convolve`]. Each worker owns a disjoint set of output rows
/// and reads the shared source; results match the serial pass exactly.
#[cfg(feature = "parallel")]
pub fn convolve_par(src: &ImageView<'_, f32>, kernel: &Kernel2D) -> Image<f32> {
    let mut out = Image::new_fill(src.width(), src.height(), 0.0f32);
    convolve_rows_par(src, &kernel.flipped(), out.data_mut());
    out
}

#[cfg(feature = "parallel")]
fn convolve_rows_par(src: &ImageView<'_, f32>, inv: &Kernel2D, out: &mut [f32]) {
    use rayon::prelude::*;

    let width = src.width();
    if width == 0 || src.height() == 0 {
        return;
    }
    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| convolve_rows(src, inv, y, row));
}

/// Reusable convolution step holding a kernel and its flipped copy.
///
/// With the `parallel` feature, [`Convolution::apply_inplace`] and the
/// [`PlaneProcessor`] impl split output rows across the rayon pool.
#[derive(Debug, Clone)]
pub struct Convolution {
    kernel: Kernel2D,
    inverted: Kernel2D,
}

impl Convolution {
    pub fn new(kernel: Kernel2D) -> Self {
        let inverted = kernel.flipped();
        Self { kernel, inverted }
    }

    pub fn gaussian(sigma: f32) -> Result<Self, Error> {
        Ok(Self::new(gaussian_kernel(sigma)?))
    }

    pub fn kernel(&self) -> &Kernel2D {
        &self.kernel
    }

    pub fn apply_inplace(&self, plane: &mut Image<f32>) {
        let snapshot = plane.clone();
        self.run(&snapshot.as_view(), plane.data_mut());
    }

    #[cfg(feature = "parallel")]
    fn run(&self, src: &ImageView<'_, f32>, out: &mut [f32]) {
        convolve_rows_par(src, &self.inverted, out);
    }

    #[cfg(not(feature = "parallel"))]
    fn run(&self, src: &ImageView<'_, f32>, out: &mut [f32]) {
        convolve_rows(src, &self.inverted, 0, out);
    }
}

impl PlaneProcessor for Convolution {
    fn process_plane(&self, plane: &mut Image<f32>) -> Result<(), Error> {
        log::trace!(
            "convolving {}x{} plane with {}x{} kernel",
            plane.width(),
            plane.height(),
            self.kernel.width(),
            self.kernel.height()
        );
        self.apply_inplace(plane);
        Ok(())
    }
}

/// Computes output rows `first_row..` into `out`, which holds whole rows of
/// `src.width()` samples. `inv` must already be flipped.
fn convolve_rows(src: &ImageView<'_, f32>, inv: &Kernel2D, first_row: usize, out: &mut [f32]) {
    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(out.len() % width, 0);

    let half_h = (inv.height() / 2) as isize;
    let half_w = (inv.width() / 2) as isize;

    for (r, out_row) in out.chunks_exact_mut(width).enumerate() {
        let top = (first_row + r) as isize - half_h;
        for (x, out_px) in out_row.iter_mut().enumerate() {
            let left = x as isize - half_w;
            let mut acc = 0.0f32;
            for ky in 0..inv.height() {
                let sy = top + ky as isize;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                let src_row = src.row(sy as usize);
                for (kx, &kv) in inv.row(ky).iter().enumerate() {
                    let sx = left + kx as isize;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    acc += kv * src_row[sx as usize];
                }
            }
            *out_px = acc;
        }
    }
}

//! Element-wise arithmetic on `f32` planes.
//!
//! Binary operations require identical `(width, height)` and fail with
//! [`Error::DimensionMismatch`] otherwise. The `_inplace` variants write into
//! the left operand; the others allocate a new plane.

use crate::{Error, Image};

pub fn add(a: &Image<f32>, b: &Image<f32>) -> Result<Image<f32>, Error> {
    let mut out = a.clone();
    add_inplace(&mut out, b)?;
    Ok(out)
}

pub fn subtract(a: &Image<f32>, b: &Image<f32>) -> Result<Image<f32>, Error> {
    let mut out = a.clone();
    subtract_inplace(&mut out, b)?;
    Ok(out)
}

pub fn add_inplace(dst: &mut Image<f32>, rhs: &Image<f32>) -> Result<(), Error> {
    dst.ensure_same_dims(rhs)?;
    for (d, &r) in dst.data_mut().iter_mut().zip(rhs.data()) {
        *d += r;
    }
    Ok(())
}

pub fn subtract_inplace(dst: &mut Image<f32>, rhs: &Image<f32>) -> Result<(), Error> {
    dst.ensure_same_dims(rhs)?;
    for (d, &r) in dst.data_mut().iter_mut().zip(rhs.data()) {
        *d -= r;
    }
    Ok(())
}

pub fn add_scalar_inplace(dst: &mut Image<f32>, value: f32) {
    for d in dst.data_mut() {
        *d += value;
    }
}

//! Multi-channel float images.
//!
//! A [`ColorImage`] is a small ordered set of `f32` planes that share one
//! size. Every operation is applied to each channel independently; no color
//! space conversion ever happens here.

use crate::{Error, Image, arith, blit};

pub const MAX_CHANNELS: usize = 4;

/// Single-plane operation that can be run across every channel of a
/// [`ColorImage`].
///
/// Implementations must leave the plane dimensions unchanged.
pub trait PlaneProcessor {
    fn process_plane(&self, plane: &mut Image<f32>) -> Result<(), Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorImage {
    width: usize,
    height: usize,
    planes: Vec<Image<f32>>,
}

impl ColorImage {
    /// Zero-filled image with `channels` planes.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, Error> {
        check_channel_count(channels)?;
        Ok(Self {
            width,
            height,
            planes: (0..channels)
                .map(|_| Image::new_fill(width, height, 0.0f32))
                .collect(),
        })
    }

    pub fn from_planes(planes: Vec<Image<f32>>) -> Result<Self, Error> {
        check_channel_count(planes.len())?;
        let (width, height) = planes[0].dims();
        for plane in &planes[1..] {
            planes[0].ensure_same_dims(plane)?;
        }
        Ok(Self {
            width,
            height,
            planes,
        })
    }

    /// Splits an interleaved buffer (`RGBRGB...`) into planes.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        channels: usize,
        data: &[f32],
    ) -> Result<Self, Error> {
        check_channel_count(channels)?;
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let mut img = Self::new(width, height, channels)?;
        for (c, plane) in img.planes.iter_mut().enumerate() {
            for (dst, px) in plane.data_mut().iter_mut().zip(data.chunks_exact(channels)) {
                *dst = px[c];
            }
        }
        Ok(img)
    }

    pub fn to_interleaved(&self) -> Vec<f32> {
        let channels = self.planes.len();
        let mut out = vec![0.0f32; self.width * self.height * channels];
        for (c, plane) in self.planes.iter().enumerate() {
            for (px, &v) in out.chunks_exact_mut(channels).zip(plane.data()) {
                px[c] = v;
            }
        }
        out
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn num_channels(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, channel: usize) -> Option<&Image<f32>> {
        self.planes.get(channel)
    }

    pub fn planes(&self) -> &[Image<f32>] {
        &self.planes
    }

    pub fn get(&self, channel: usize, x: usize, y: usize) -> Option<f32> {
        self.planes.get(channel)?.get(x, y).copied()
    }

    pub fn set(&mut self, channel: usize, x: usize, y: usize, value: f32) -> Result<(), Error> {
        let px = self
            .planes
            .get_mut(channel)
            .and_then(|p| p.get_mut(x, y))
            .ok_or(Error::OutOfBounds)?;
        *px = value;
        Ok(())
    }

    /// Same size and same channel count, or the matching error.
    pub fn ensure_compatible(&self, other: &ColorImage) -> Result<(), Error> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        if self.num_channels() != other.num_channels() {
            return Err(Error::ChannelMismatch {
                expected: self.num_channels(),
                actual: other.num_channels(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &ColorImage) -> Result<ColorImage, Error> {
        let mut out = self.clone();
        out.add_inplace(other)?;
        Ok(out)
    }

    pub fn subtract(&self, other: &ColorImage) -> Result<ColorImage, Error> {
        let mut out = self.clone();
        out.subtract_inplace(other)?;
        Ok(out)
    }

    pub fn add_inplace(&mut self, other: &ColorImage) -> Result<(), Error> {
        self.ensure_compatible(other)?;
        for (dst, rhs) in self.planes.iter_mut().zip(&other.planes) {
            arith::add_inplace(dst, rhs)?;
        }
        Ok(())
    }

    pub fn subtract_inplace(&mut self, other: &ColorImage) -> Result<(), Error> {
        self.ensure_compatible(other)?;
        for (dst, rhs) in self.planes.iter_mut().zip(&other.planes) {
            arith::subtract_inplace(dst, rhs)?;
        }
        Ok(())
    }

    pub fn add_scalar(&self, value: f32) -> ColorImage {
        let mut out = self.clone();
        out.add_scalar_inplace(value);
        out
    }

    pub fn add_scalar_inplace(&mut self, value: f32) {
        for plane in &mut self.planes {
            arith::add_scalar_inplace(plane, value);
        }
    }

    /// Runs `processor` on every channel in order. On error `self` is left
    /// untouched.
    pub fn process_inplace<P: PlaneProcessor + ?Sized>(
        &mut self,
        processor: &P,
    ) -> Result<(), Error> {
        let dims = self.dims();
        let mut planes = self.planes.clone();
        for plane in &mut planes {
            processor.process_plane(plane)?;
            if plane.dims() != dims {
                return Err(Error::DimensionMismatch {
                    expected: dims,
                    actual: plane.dims(),
                });
            }
        }
        self.planes = planes;
        Ok(())
    }

    pub fn process<P: PlaneProcessor + ?Sized>(&self, processor: &P) -> Result<ColorImage, Error> {
        let mut out = self.clone();
        out.process_inplace(processor)?;
        Ok(out)
    }

    /// Draws `src` with its top-left corner at `(x, y)`, clipping at the
    /// borders. Both images must have the same channel count.
    pub fn draw_image(&mut self, src: &ColorImage, x: isize, y: isize) -> Result<(), Error> {
        if self.num_channels() != src.num_channels() {
            return Err(Error::ChannelMismatch {
                expected: self.num_channels(),
                actual: src.num_channels(),
            });
        }
        for (dst, s) in self.planes.iter_mut().zip(&src.planes) {
            blit(&mut dst.as_view_mut(), &s.as_view(), x, y);
        }
        Ok(())
    }
}

fn check_channel_count(channels: usize) -> Result<(), Error> {
    if channels == 0 || channels > MAX_CHANNELS {
        return Err(Error::InvalidArgument(
            "channel count must be between 1 and 4",
        ));
    }
    Ok(())
}

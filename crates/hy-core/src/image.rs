use crate::Error;

/// Owned, contiguous, row-major image buffer. `Image<f32>` is the plane type
/// every filter in the workspace works on.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Evaluates `f(x, y)` for every pixel, row by row.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            data,
        }
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

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        (x < self.width && y < self.height).then(|| &self.data[y * self.width + x])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(&mut self.data[y * self.width + x])
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &mut self.data,
        }
    }

    /// Fails with [`Error::DimensionMismatch`] unless `other` has the same
    /// width and height.
    pub fn ensure_same_dims<U>(&self, other: &Image<U>) -> Result<(), Error> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> Image<T> {
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width.saturating_mul(height)],
        }
    }
}

/// Borrowed read-only window. `stride` counts elements between row starts
/// and may exceed `width` when the view is a crop of a larger buffer.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }
        let needed = span_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
        if data.len() < needed {
            return Err(Error::SizeMismatch {
                expected: needed,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
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

    /// Row `y`; panics when `y >= height`.
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).map(|y| self.row(y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Window of `width x height` pixels whose top-left corner is `(x, y)`.
    /// Samples outside the window are invisible through the returned view.
    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageView<'a, T>, Error> {
        let fits = |origin: usize, len: usize, limit: usize| {
            origin.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(Error::OutOfBounds);
        }

        let start = y * self.stride + x;
        let tail = self.data.get(start..).unwrap_or(&[]);
        ImageView::from_slice(width, height, self.stride, tail).map_err(|_| Error::OutOfBounds)
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        self.data.get(..self.width * self.height)
    }
}

impl<T: Clone> ImageView<'_, T> {
    /// Deep-copies the viewed pixels into a contiguous owned image.
    pub fn to_image(&self) -> Image<T> {
        let data = match self.as_contiguous_slice() {
            Some(contig) => contig.to_vec(),
            None => self.rows().flat_map(<[T]>::iter).cloned().collect(),
        };
        Image {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

/// Mutable counterpart of [`ImageView`], used as a drawing target.
#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<T> ImageViewMut<'_, T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }
}

/// Elements from the first sample to the last one a view touches.
fn span_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    (height - 1).checked_mul(stride)?.checked_add(width)
}

/// Maps 8-bit samples to `[0, 1]`.
pub fn to_f32_unit(img: &ImageView<'_, u8>) -> Image<f32> {
    Image {
        width: img.width(),
        height: img.height(),
        data: img
            .rows()
            .flatten()
            .map(|&v| f32::from(v) / 255.0)
            .collect(),
    }
}

/// Inverse of [`to_f32_unit`]: clamps to `[0, 1]` and rounds to 8 bits.
pub fn to_u8_clamped(img: &ImageView<'_, f32>) -> Image<u8> {
    Image {
        width: img.width(),
        height: img.height(),
        data: img
            .rows()
            .flatten()
            .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Image, ImageView, to_f32_unit, to_u8_clamped};
    use crate::Error;

    #[test]
    fn strided_view_skips_padding() {
        let data = vec![1u8, 2, 3, 99, 4, 5, 6, 88];
        let view = ImageView::from_slice(3, 2, 4, &data).expect("valid view");

        assert_eq!(view.row(1), &[4, 5, 6]);
        assert_eq!(view.get(2, 1), Some(&6));
        assert_eq!(view.get(3, 1), None);
        assert!(view.as_contiguous_slice().is_none());
        assert_eq!(view.to_image().data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn from_slice_validates_stride_and_length() {
        let data = [0.0f32; 7];
        assert_eq!(
            ImageView::from_slice(3, 2, 2, &data).unwrap_err(),
            Error::InvalidStride
        );
        // Last row needs only `width` samples, not a full stride.
        assert!(ImageView::from_slice(3, 2, 4, &data).is_ok());
        assert!(matches!(
            ImageView::from_slice(3, 3, 4, &data),
            Err(Error::SizeMismatch { expected: 11, .. })
        ));
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Image::from_vec(3, 2, vec![0.0f32; 5]).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn subview_to_image_copies_only_window() {
        let img = Image::from_fn(4, 3, |x, y| (10 * y + x) as f32);
        let sub = img.as_view().subview(1, 1, 3, 2).expect("valid subview");

        assert!(!sub.is_contiguous());
        let owned = sub.to_image();
        assert_eq!(owned.dims(), (3, 2));
        assert_eq!(owned.data(), &[11.0, 12.0, 13.0, 21.0, 22.0, 23.0]);

        assert_eq!(
            img.as_view().subview(2, 0, 3, 1).unwrap_err(),
            Error::OutOfBounds
        );
        assert!(img.as_view().subview(4, 3, 0, 0).is_ok());
    }

    #[test]
    fn row_mut_writes_through_view() {
        let mut img = Image::new_fill(3, 2, 0u8);
        img.as_view_mut().row_mut(1).copy_from_slice(&[7, 8, 9]);
        assert_eq!(img.data(), &[0, 0, 0, 7, 8, 9]);
    }

    #[test]
    fn ensure_same_dims_reports_both_sides() {
        let a = Image::new_fill(4, 2, 0.0f32);
        let b = Image::new_fill(2, 4, 0.0f32);
        assert_eq!(
            a.ensure_same_dims(&b),
            Err(Error::DimensionMismatch {
                expected: (4, 2),
                actual: (2, 4)
            })
        );
        assert!(a.ensure_same_dims(&a.clone()).is_ok());
    }

    #[test]
    fn unit_conversion_round_trips_extremes_and_clamps() {
        let img8 = Image::from_vec(3, 1, vec![0u8, 128, 255]).expect("valid image");
        let f = to_f32_unit(&img8.as_view());
        assert_eq!(f.data()[0], 0.0);
        assert_eq!(f.data()[2], 1.0);

        let out = Image::from_vec(3, 1, vec![-0.25f32, 0.5, 1.75]).expect("valid image");
        assert_eq!(to_u8_clamped(&out.as_view()).data(), &[0, 128, 255]);
    }
}

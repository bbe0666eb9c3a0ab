use hy_core::Error;

/// Dense 2D convolution kernel, row-major.
///
/// Always well-formed: both dimensions are at least 1 and every row has the
/// same width. Construction is the only place this is checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2D {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Kernel2D {
    pub fn from_vec(width: usize, height: usize, weights: Vec<f32>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument("kernel dimensions must be >= 1"));
        }
        let expected = width
            .checked_mul(height)
            .ok_or(Error::InvalidArgument("kernel size overflow"))?;
        if weights.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: weights.len(),
            });
        }

        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Builds a kernel from nested rows, rejecting empty input and rows whose
    /// width differs from the first row's.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, Error> {
        let first = rows
            .first()
            .ok_or(Error::InvalidArgument("kernel must have at least one row"))?;
        let width = first.as_ref().len();
        if width == 0 {
            return Err(Error::InvalidArgument("kernel rows must not be empty"));
        }

        let mut weights = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::InvalidArgument("kernel rows must have uniform width"));
            }
            weights.extend_from_slice(row);
        }

        Self::from_vec(width, rows.len(), weights)
    }

    /// The 1x1 kernel `[[1.0]]`.
    pub fn identity() -> Self {
        Self {
            width: 1,
            height: 1,
            weights: vec![1.0],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.width;
        &self.weights[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.weights.get(y * self.width + x).copied()
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Kernel rotated by 180 degrees: `out[i][j] = k[h-1-i][w-1-j]`.
    ///
    /// Row-major storage makes this a plain reversal of the weight buffer.
    pub fn flipped(&self) -> Self {
        let mut weights = self.weights.clone();
        weights.reverse();
        Self {
            width: self.width,
            height: self.height,
            weights,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.weights
            .chunks_exact(self.width)
            .map(<[f32]>::to_vec)
            .collect()
    }
}

/// Side length of the Gaussian kernel produced for `sigma`.
///
/// `size = floor(8*sigma + 1)`, bumped to the next odd value when even, which
/// covers roughly 4 sigma on each side of the center.
pub fn gaussian_size(sigma: f32) -> Result<usize, Error> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(Error::InvalidArgument("sigma must be > 0 and finite"));
    }

    let mut size = (8.0 * sigma + 1.0).floor() as usize;
    if size.is_multiple_of(2) {
        size = size
            .checked_add(1)
            .ok_or(Error::InvalidArgument("sigma too large"))?;
    }
    size.checked_mul(size)
        .ok_or(Error::InvalidArgument("sigma too large"))?;
    Ok(size)
}

/// Square, odd-sized, normalized 2D Gaussian.
///
/// Cell `(i, j)` sits at offset `(i - size/2, j - size/2)` from the center
/// (integer division) and gets `exp(-(x^2 + y^2) / (2 sigma^2))` before the
/// whole kernel is divided by its sum.
pub fn gaussian_kernel(sigma: f32) -> Result<Kernel2D, Error> {
    let size = gaussian_size(sigma)?;
    let half = (size / 2) as isize;
    let two_sigma2 = 2.0 * sigma * sigma;

    let mut weights = vec![0.0f32; size * size];
    for (idx, w) in weights.iter_mut().enumerate() {
        let x = (idx / size) as isize - half;
        let y = (idx % size) as isize - half;
        let r2 = (x * x + y * y) as f32;
        *w = (-r2 / two_sigma2).exp();
    }

    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }

    Kernel2D::from_vec(size, size, weights)
}

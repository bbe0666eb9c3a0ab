//! Hybrid images: the low frequencies of one image plus the high frequencies
//! of another.
//!
//! - Low-pass: every channel convolved with a normalized Gaussian.
//! - High-pass: the image minus its own low-pass; values are centered near
//!   zero and may be negative.
//! - Hybrid: `low_pass(a, sa) + high_pass(b, sb)`, channel by channel.
//!
//! Inputs combined into one hybrid must share size and channel count.

use hy_conv::Convolution;
use hy_core::{ColorImage, Error};
use serde::{Deserialize, Serialize};

/// Offset added by [`display_high_pass`] to bring a zero-centered high-pass
/// image into a viewable `[0, 1]` range.
pub const HIGH_PASS_DISPLAY_OFFSET: f32 = 0.5;

/// Gaussian-blurred copy of `image`.
pub fn make_low_pass(image: &ColorImage, sigma: f32) -> Result<ColorImage, Error> {
    let conv = Convolution::gaussian(sigma)?;
    log::debug!(
        "low-pass sigma={sigma} kernel={}x{} image={}x{}x{}",
        conv.kernel().width(),
        conv.kernel().height(),
        image.width(),
        image.height(),
        image.num_channels()
    );

    let mut low = image.clone();
    low.process_inplace(&conv)?;
    Ok(low)
}

/// `image - make_low_pass(image, sigma)`.
pub fn make_high_pass(image: &ColorImage, sigma: f32) -> Result<ColorImage, Error> {
    let low = make_low_pass(image, sigma)?;
    image.subtract(&low)
}

pub fn make_hybrid(
    low_image: &ColorImage,
    low_sigma: f32,
    high_image: &ColorImage,
    high_sigma: f32,
) -> Result<ColorImage, Error> {
    low_image.ensure_compatible(high_image)?;
    let low = make_low_pass(low_image, low_sigma)?;
    let high = make_high_pass(high_image, high_sigma)?;
    low.add(&high)
}

/// `high_pass + 0.5` on every channel. Visualization only.
pub fn display_high_pass(high_pass: &ColorImage) -> ColorImage {
    high_pass.add_scalar(HIGH_PASS_DISPLAY_OFFSET)
}

/// Sigmas for one hybrid composition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridParams {
    /// Gaussian sigma for the image that contributes coarse structure.
    pub low_sigma: f32,
    /// Gaussian sigma whose low-pass is removed from the detail image.
    pub high_sigma: f32,
}

impl Default for HybridParams {
    fn default() -> Self {
        Self {
            low_sigma: 4.0,
            high_sigma: 4.0,
        }
    }
}

impl HybridParams {
    pub fn new(low_sigma: f32, high_sigma: f32) -> Self {
        Self {
            low_sigma,
            high_sigma,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        for sigma in [self.low_sigma, self.high_sigma] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(Error::InvalidArgument("sigma must be > 0 and finite"));
            }
        }
        Ok(())
    }
}

/// Intermediate and final images of one composition.
#[derive(Debug, Clone)]
pub struct HybridImages {
    pub low_pass: ColorImage,
    pub high_pass: ColorImage,
    pub hybrid: ColorImage,
}

/// Runs the full composition once, keeping the low-pass and high-pass
/// images alongside the hybrid.
pub fn compose(
    low_image: &ColorImage,
    high_image: &ColorImage,
    params: &HybridParams,
) -> Result<HybridImages, Error> {
    params.validate()?;
    low_image.ensure_compatible(high_image)?;

    let low_pass = make_low_pass(low_image, params.low_sigma)?;
    let high_pass = make_high_pass(high_image, params.high_sigma)?;
    let hybrid = low_pass.add(&high_pass)?;

    Ok(HybridImages {
        low_pass,
        high_pass,
        hybrid,
    })
}

#[cfg(test)]
mod tests {
    use hy_conv::{convolve, gaussian_kernel};
    use hy_core::{ColorImage, Error, Image};

    use super::{
        HybridParams, compose, display_high_pass, make_high_pass, make_hybrid, make_low_pass,
    };

    fn textured_rgb(width: usize, height: usize, seed: usize) -> ColorImage {
        let planes = (0..3)
            .map(|c| {
                Image::from_fn(width, height, |x, y| {
                    (((x * 37 + y * 11 + c * 5 + seed) % 23) as f32) / 22.0
                })
            })
            .collect();
        ColorImage::from_planes(planes).expect("rgb planes")
    }

    fn max_abs_diff(a: &ColorImage, b: &ColorImage) -> f32 {
        a.planes()
            .iter()
            .zip(b.planes())
            .flat_map(|(pa, pb)| pa.data().iter().zip(pb.data()).map(|(x, y)| (x - y).abs()))
            .fold(0.0f32, f32::max)
    }

    #[test]
    fn low_pass_matches_per_channel_convolution() {
        let img = textured_rgb(16, 12, 0);
        let low = make_low_pass(&img, 1.5).expect("valid sigma");
        let kernel = gaussian_kernel(1.5).expect("valid sigma");

        assert_eq!(low.dims(), img.dims());
        for c in 0..3 {
            let expected = convolve(&img.plane(c).expect("channel").as_view(), &kernel);
            assert_eq!(low.plane(c), Some(&expected));
        }
    }

    #[test]
    fn high_pass_of_flat_region_is_zero_away_from_borders() {
        let planes = (0..3).map(|_| Image::new_fill(40, 40, 0.6f32)).collect();
        let img = ColorImage::from_planes(planes).expect("rgb planes");
        let sigma = 1.0;
        let high = make_high_pass(&img, sigma).expect("valid sigma");

        // Kernel radius for sigma=1 is 4; zero padding only affects pixels
        // closer than that to the border.
        for c in 0..3 {
            for y in 4..36 {
                for x in 4..36 {
                    let v = high.get(c, x, y).expect("in bounds");
                    assert!(v.abs() < 1e-5, "({x},{y}) = {v}");
                }
            }
        }
        // At the corner the blurred value is darker, so the residual is
        // positive.
        assert!(high.get(0, 0, 0).expect("in bounds") > 0.1);
    }

    #[test]
    fn hybrid_of_identical_inputs_reconstructs_image() {
        let img = textured_rgb(24, 18, 3);
        for sigma in [0.5f32, 2.0, 4.0] {
            let hybrid = make_hybrid(&img, sigma, &img, sigma).expect("valid inputs");
            assert!(max_abs_diff(&hybrid, &img) < 1e-5, "sigma={sigma}");
        }
    }

    #[test]
    fn hybrid_is_low_plus_high() {
        let a = textured_rgb(20, 20, 1);
        let b = textured_rgb(20, 20, 9);
        let hybrid = make_hybrid(&a, 3.0, &b, 1.0).expect("valid inputs");

        let expected = make_low_pass(&a, 3.0)
            .and_then(|low| low.add(&make_high_pass(&b, 1.0)?))
            .expect("valid inputs");
        assert_eq!(hybrid, expected);
    }

    #[test]
    fn display_shift_is_exactly_one_half() {
        let img = textured_rgb(8, 8, 2);
        let high = make_high_pass(&img, 1.0).expect("valid sigma");
        let shown = display_high_pass(&high);

        assert_eq!(shown.dims(), high.dims());
        for (h, s) in high.planes().iter().zip(shown.planes()) {
            for (&hv, &sv) in h.data().iter().zip(s.data()) {
                assert_eq!(sv, hv + 0.5);
            }
        }
    }

    #[test]
    fn mismatched_inputs_fail() {
        let a = textured_rgb(16, 16, 0);
        let b = textured_rgb(16, 8, 0);
        assert!(matches!(
            make_hybrid(&a, 2.0, &b, 2.0),
            Err(Error::DimensionMismatch { .. })
        ));

        let gray = ColorImage::new(16, 16, 1).expect("valid image");
        assert!(matches!(
            make_hybrid(&a, 2.0, &gray, 2.0),
            Err(Error::ChannelMismatch { .. })
        ));
    }

    #[test]
    fn non_positive_sigma_fails() {
        let img = textured_rgb(8, 8, 0);
        assert!(matches!(
            make_low_pass(&img, 0.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(make_high_pass(&img, -1.0).is_err());
        assert!(make_hybrid(&img, 1.0, &img, f32::NAN).is_err());
    }

    #[test]
    fn compose_returns_all_stages() {
        let a = textured_rgb(12, 10, 4);
        let b = textured_rgb(12, 10, 7);
        let params = HybridParams::new(2.0, 1.0);
        let out = compose(&a, &b, &params).expect("valid inputs");

        assert_eq!(out.low_pass, make_low_pass(&a, 2.0).expect("valid"));
        assert_eq!(out.high_pass, make_high_pass(&b, 1.0).expect("valid"));
        assert_eq!(out.hybrid, make_hybrid(&a, 2.0, &b, 1.0).expect("valid"));

        assert!(compose(&a, &b, &HybridParams::new(0.0, 1.0)).is_err());
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: HybridParams = serde_json::from_str(r#"{"low_sigma": 6.5}"#).expect("valid json");
        assert_eq!(p, HybridParams::new(6.5, 4.0));
        assert!(p.validate().is_ok());
    }
}

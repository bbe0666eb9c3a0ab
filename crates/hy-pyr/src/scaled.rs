//! Side-by-side visualization of successive half-size reductions.
//!
//! Level 0 is a copy of the input; every further level is the reducer applied
//! to the previous one. The levels are laid out left to right in generation
//! order on a canvas whose width is the sum of the level widths and whose
//! height is the tallest level. Each level is bottom-aligned.

use hy_core::{ColorImage, Error, Image, blit};

use crate::downsample::downsample2x2_mean_f32;

/// Number of levels drawn by [`generate_scaled_images`]: scales 1, 1/2, 1/4
/// and 1/8.
pub const DEFAULT_LEVELS: usize = 4;

/// Produces the next, smaller level from the current one.
pub trait Reducer<I> {
    fn reduce(&self, image: &I) -> Result<I, Error>;
}

/// Image type that can act as a drawing surface.
pub trait Canvas: Sized {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Zero-filled surface of the given size, otherwise compatible with
    /// `self` (same channel count).
    fn blank_like(&self, width: usize, height: usize) -> Result<Self, Error>;

    /// Draws `src` with its top-left corner at `(x, y)`.
    fn blit(&mut self, src: &Self, x: usize, y: usize) -> Result<(), Error>;
}

/// 2x2 block-mean reducer (drop-odd dimensions).
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfSize;

impl Reducer<Image<f32>> for HalfSize {
    fn reduce(&self, image: &Image<f32>) -> Result<Image<f32>, Error> {
        Ok(downsample2x2_mean_f32(&image.as_view()))
    }
}

impl Reducer<ColorImage> for HalfSize {
    fn reduce(&self, image: &ColorImage) -> Result<ColorImage, Error> {
        let planes = image
            .planes()
            .iter()
            .map(|p| downsample2x2_mean_f32(&p.as_view()))
            .collect();
        ColorImage::from_planes(planes)
    }
}

impl Canvas for Image<f32> {
    fn width(&self) -> usize {
        Image::width(self)
    }

    fn height(&self) -> usize {
        Image::height(self)
    }

    fn blank_like(&self, width: usize, height: usize) -> Result<Self, Error> {
        Ok(Image::new_fill(width, height, 0.0f32))
    }

    fn blit(&mut self, src: &Self, x: usize, y: usize) -> Result<(), Error> {
        blit(
            &mut self.as_view_mut(),
            &src.as_view(),
            to_offset(x)?,
            to_offset(y)?,
        );
        Ok(())
    }
}

impl Canvas for ColorImage {
    fn width(&self) -> usize {
        ColorImage::width(self)
    }

    fn height(&self) -> usize {
        ColorImage::height(self)
    }

    fn blank_like(&self, width: usize, height: usize) -> Result<Self, Error> {
        ColorImage::new(width, height, self.num_channels())
    }

    fn blit(&mut self, src: &Self, x: usize, y: usize) -> Result<(), Error> {
        self.draw_image(src, to_offset(x)?, to_offset(y)?)
    }
}

/// Where one level lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasLayout {
    pub width: usize,
    pub height: usize,
    pub placements: Vec<Placement>,
}

/// Computes the bottom-aligned, left-to-right layout for levels of the given
/// `(width, height)` sizes.
pub fn canvas_layout(sizes: &[(usize, usize)]) -> CanvasLayout {
    let width = sizes.iter().map(|&(w, _)| w).sum();
    let height = sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);

    let mut x = 0usize;
    let placements = sizes
        .iter()
        .map(|&(w, h)| {
            let p = Placement {
                x,
                y: height - h,
                width: w,
                height: h,
            };
            x += w;
            p
        })
        .collect();

    CanvasLayout {
        width,
        height,
        placements,
    }
}

/// Builds `levels` images: a copy of `image` followed by repeated reductions.
pub fn scale_levels<I, R>(image: &I, levels: usize, reducer: &R) -> Result<Vec<I>, Error>
where
    I: Clone,
    R: Reducer<I> + ?Sized,
{
    if levels == 0 {
        return Err(Error::InvalidArgument("at least one level is required"));
    }

    let mut out = Vec::with_capacity(levels);
    out.push(image.clone());
    for _ in 1..levels {
        let next = match out.last() {
            Some(prev) => reducer.reduce(prev)?,
            None => break,
        };
        out.push(next);
    }
    Ok(out)
}

/// Canvas plus the layout used to draw it.
#[derive(Debug, Clone)]
pub struct ScaledCanvas<I> {
    pub canvas: I,
    pub layout: CanvasLayout,
}

pub fn generate_scaled_images_with<I, R>(
    image: &I,
    levels: usize,
    reducer: &R,
) -> Result<ScaledCanvas<I>, Error>
where
    I: Canvas + Clone,
    R: Reducer<I> + ?Sized,
{
    let scaled = scale_levels(image, levels, reducer)?;
    let sizes: Vec<(usize, usize)> = scaled.iter().map(|i| (i.width(), i.height())).collect();
    let layout = canvas_layout(&sizes);
    log::debug!(
        "scaled canvas {}x{} from {} levels: {:?}",
        layout.width,
        layout.height,
        levels,
        sizes
    );

    let mut canvas = image.blank_like(layout.width, layout.height)?;
    for (level, place) in scaled.iter().zip(&layout.placements) {
        canvas.blit(level, place.x, place.y)?;
    }

    Ok(ScaledCanvas { canvas, layout })
}

/// Draws the image at scales 1, 1/2, 1/4 and 1/8 side by side,
/// bottom-aligned, using [`HalfSize`].
pub fn generate_scaled_images(image: &ColorImage) -> Result<ColorImage, Error> {
    generate_scaled_images_with(image, DEFAULT_LEVELS, &HalfSize).map(|s| s.canvas)
}

fn to_offset(v: usize) -> Result<isize, Error> {
    isize::try_from(v).map_err(|_| Error::OutOfBounds)
}

#[cfg(test)]
mod tests {
    use hy_core::{ColorImage, Error, Image};

    use super::{
        Canvas, HalfSize, Placement, Reducer, canvas_layout, generate_scaled_images,
        generate_scaled_images_with, scale_levels,
    };

    fn gradient_rgb(width: usize, height: usize) -> ColorImage {
        let r = Image::from_fn(width, height, |x, _| x as f32 / width as f32);
        let g = Image::from_fn(width, height, |_, y| y as f32 / height as f32);
        let b = Image::new_fill(width, height, 0.5f32);
        ColorImage::from_planes(vec![r, g, b]).expect("rgb planes")
    }

    #[test]
    fn layout_for_64_square_matches_expected_offsets() {
        let layout = canvas_layout(&[(64, 64), (32, 32), (16, 16), (8, 8)]);
        assert_eq!(layout.width, 120);
        assert_eq!(layout.height, 64);
        let xs: Vec<usize> = layout.placements.iter().map(|p| p.x).collect();
        let ys: Vec<usize> = layout.placements.iter().map(|p| p.y).collect();
        assert_eq!(xs, vec![0, 64, 96, 112]);
        assert_eq!(ys, vec![0, 32, 48, 56]);
    }

    #[test]
    fn scaled_canvas_for_64_square() {
        let img = gradient_rgb(64, 64);
        let canvas = generate_scaled_images(&img).expect("valid image");

        assert_eq!(canvas.dims(), (120, 64));
        assert_eq!(canvas.num_channels(), 3);

        // Level 0 is copied verbatim.
        for c in 0..3 {
            assert_eq!(canvas.get(c, 10, 20), img.get(c, 10, 20));
        }

        // Above the bottom-aligned 32x32 level the canvas stays blank.
        assert_eq!(canvas.get(2, 64, 31), Some(0.0));
        assert_eq!(canvas.get(2, 64, 32), Some(0.5));
        assert_eq!(canvas.get(2, 96, 47), Some(0.0));
        assert_eq!(canvas.get(2, 96, 48), Some(0.5));
        assert_eq!(canvas.get(2, 112, 55), Some(0.0));
        assert_eq!(canvas.get(2, 119, 63), Some(0.5));
    }

    #[test]
    fn scaled_levels_match_repeated_reduction() {
        let img = gradient_rgb(20, 12);
        let levels = scale_levels(&img, 4, &HalfSize).expect("levels >= 1");
        let dims: Vec<(usize, usize)> = levels.iter().map(|l| l.dims()).collect();
        assert_eq!(dims, vec![(20, 12), (10, 6), (5, 3), (2, 1)]);
        assert_eq!(levels[0], img);
        assert_eq!(levels[2], HalfSize.reduce(&levels[1]).expect("reducible"));
    }

    #[test]
    fn input_is_not_mutated() {
        let img = gradient_rgb(16, 16);
        let before = img.clone();
        let _ = generate_scaled_images(&img).expect("valid image");
        assert_eq!(img, before);
    }

    #[test]
    fn zero_levels_is_rejected() {
        let img = gradient_rgb(8, 8);
        assert!(scale_levels(&img, 0, &HalfSize).is_err());
    }

    #[test]
    fn custom_level_count_on_single_plane() {
        let plane = Image::new_fill(16, 8, 1.0f32);
        let scaled = generate_scaled_images_with(&plane, 2, &HalfSize).expect("valid");
        assert_eq!(Canvas::width(&scaled.canvas), 24);
        assert_eq!(Canvas::height(&scaled.canvas), 8);
        assert_eq!(
            scaled.layout.placements[1],
            Placement {
                x: 16,
                y: 4,
                width: 8,
                height: 4
            }
        );
        assert_eq!(scaled.canvas.get(16, 3), Some(&0.0));
        assert_eq!(scaled.canvas.get(16, 4), Some(&1.0));
    }

    struct Crop;

    impl Reducer<Image<f32>> for Crop {
        fn reduce(&self, image: &Image<f32>) -> Result<Image<f32>, Error> {
            let w = image.width().saturating_sub(1);
            let view = image.as_view().subview(0, 0, w, image.height())?;
            Ok(view.to_image())
        }
    }

    #[test]
    fn non_halving_reducer_changes_layout() {
        let plane = Image::new_fill(4, 3, 2.0f32);
        let scaled = generate_scaled_images_with(&plane, 3, &Crop).expect("valid");
        assert_eq!(scaled.layout.width, 4 + 3 + 2);
        assert_eq!(scaled.layout.height, 3);
        assert!(scaled.canvas.data().iter().all(|&v| v == 2.0));
    }
}

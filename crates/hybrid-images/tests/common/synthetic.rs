use hybrid_images::{ColorImage, Image};

/// Checkerboard with `cell`-sized squares alternating between `lo` and `hi`
/// on every channel.
pub fn checkerboard_rgb(width: usize, height: usize, cell: usize, lo: f32, hi: f32) -> ColorImage {
    assert!(cell > 0, "cell size must be positive");
    let plane = Image::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)).is_multiple_of(2) { lo } else { hi }
    });
    ColorImage::from_planes(vec![plane.clone(), plane.clone(), plane]).expect("rgb planes")
}

/// Deterministic pseudo-random texture in `[0, 1]`, different per channel.
pub fn noise_rgb(width: usize, height: usize, seed: u32) -> ColorImage {
    let planes = (0..3u32)
        .map(|c| {
            Image::from_fn(width, height, |x, y| {
                let mut h = (x as u32)
                    .wrapping_mul(73_856_093)
                    ^ (y as u32).wrapping_mul(19_349_663)
                    ^ c.wrapping_mul(83_492_791)
                    ^ seed;
                h ^= h >> 13;
                h = h.wrapping_mul(0x5bd1_e995);
                h ^= h >> 15;
                (h & 0xffff) as f32 / 65_535.0
            })
        })
        .collect();
    ColorImage::from_planes(planes).expect("rgb planes")
}

pub fn max_abs_diff(a: &ColorImage, b: &ColorImage) -> f32 {
    assert_eq!(a.dims(), b.dims());
    assert_eq!(a.num_channels(), b.num_channels());
    a.planes()
        .iter()
        .zip(b.planes())
        .flat_map(|(pa, pb)| pa.data().iter().zip(pb.data()).map(|(x, y)| (x - y).abs()))
        .fold(0.0f32, f32::max)
}

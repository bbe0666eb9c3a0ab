//! Example: hybrid image from two synthetic patterns.
//!
//! A smooth radial blob supplies the low frequencies and a fine checkerboard
//! supplies the high frequencies. The demo prints per-stage statistics, the
//! scale canvas layout and timing. Viewed up close the checkerboard dominates
//! the hybrid; in the smaller canvas levels only the blob survives.
//!
//! Run from the workspace root:
//!   cargo run -p hybrid-images --example hybrid_demo -- --help
//!   RUST_LOG=debug cargo run -p hybrid-images --example hybrid_demo

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use hybrid_images::{
    ColorImage, HalfSize, HybridParams, Image, compose, display_high_pass,
    generate_scaled_images_with,
};

#[derive(Parser, Debug)]
#[command(about = "Compose a hybrid image from synthetic patterns")]
struct Args {
    #[arg(long, default_value_t = 256)]
    width: usize,

    #[arg(long, default_value_t = 192)]
    height: usize,

    /// Checkerboard cell size in pixels
    #[arg(long, default_value_t = 3)]
    cell: usize,

    #[arg(long, default_value_t = 4.0)]
    low_sigma: f32,

    #[arg(long, default_value_t = 2.0)]
    high_sigma: f32,

    #[arg(long, default_value_t = hybrid_images::DEFAULT_LEVELS)]
    levels: usize,
}

fn blob(width: usize, height: usize) -> Result<ColorImage> {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let r2 = (cx.min(cy) * 0.6).powi(2);
    let plane = |tint: f32| {
        Image::from_fn(width, height, |x, y| {
            let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
            tint * (-d2 / r2).exp()
        })
    };
    ColorImage::from_planes(vec![plane(0.9), plane(0.6), plane(0.3)])
        .context("building blob image")
}

fn checkerboard(width: usize, height: usize, cell: usize) -> Result<ColorImage> {
    let cell = cell.max(1);
    let plane = Image::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)).is_multiple_of(2) {
            0.85
        } else {
            0.15
        }
    });
    ColorImage::from_planes(vec![plane.clone(), plane.clone(), plane])
        .context("building checkerboard image")
}

fn stats(img: &ColorImage) -> (f32, f32, f32) {
    let mut min_v = f32::INFINITY;
    let mut max_v = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for plane in img.planes() {
        for &v in plane.data() {
            min_v = min_v.min(v);
            max_v = max_v.max(v);
            sum += f64::from(v);
            n += 1;
        }
    }
    let mean = if n == 0 { 0.0 } else { (sum / n as f64) as f32 };
    (min_v, max_v, mean)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let low_src = blob(args.width, args.height)?;
    let high_src = checkerboard(args.width, args.height, args.cell)?;
    let params = HybridParams::new(args.low_sigma, args.high_sigma);

    let t0 = Instant::now();
    let stages = compose(&low_src, &high_src, &params).context("composing hybrid image")?;
    let compose_ms = t0.elapsed().as_secs_f64() * 1e3;

    let t1 = Instant::now();
    let scaled = generate_scaled_images_with(&stages.hybrid, args.levels, &HalfSize)
        .context("building scaled canvas")?;
    let scaled_ms = t1.elapsed().as_secs_f64() * 1e3;

    let shown = display_high_pass(&stages.high_pass);
    for (name, img) in [
        ("low-pass", &stages.low_pass),
        ("high-pass", &stages.high_pass),
        ("high-pass (display)", &shown),
        ("hybrid", &stages.hybrid),
    ] {
        let (lo, hi, mean) = stats(img);
        println!("{name:<20} min={lo:+.4} max={hi:+.4} mean={mean:+.4}");
    }

    println!(
        "canvas {}x{} from {} levels",
        scaled.layout.width,
        scaled.layout.height,
        scaled.layout.placements.len()
    );
    for (i, p) in scaled.layout.placements.iter().enumerate() {
        println!("  level {i}: {}x{} at ({}, {})", p.width, p.height, p.x, p.y);
    }
    println!("compose: {compose_ms:.2} ms, canvas: {scaled_ms:.2} ms");

    Ok(())
}

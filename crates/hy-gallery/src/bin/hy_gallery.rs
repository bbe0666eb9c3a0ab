use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use hybrid_images::{
    ColorImage, HalfSize, HybridParams, compose, display_high_pass, gaussian_kernel,
    gaussian_size, generate_scaled_images_with, make_high_pass, make_low_pass, to_f32_unit,
    to_u8_clamped,
};
use hybrid_images::{Image, ImageView};
use image::RgbImage;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "hy_gallery")]
#[command(about = "Render hybrid images, filter stages and scale canvases")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "hybrid")]
    Hybrid(HybridArgs),
    #[command(name = "low-pass")]
    LowPass(FilterArgs),
    #[command(name = "high-pass")]
    HighPass(FilterArgs),
    #[command(name = "pyramid")]
    Pyramid(PyramidArgs),
    #[command(name = "kernel")]
    Kernel(KernelArgs),
}

#[derive(Args, Debug, Clone)]
struct OutArgs {
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct HybridArgs {
    /// Image contributing the coarse structure.
    #[arg(long, required = true)]
    low: PathBuf,
    /// Image contributing the fine detail.
    #[arg(long, required = true)]
    high: PathBuf,
    #[arg(long)]
    low_sigma: Option<f32>,
    #[arg(long)]
    high_sigma: Option<f32>,
    /// JSON file with `low_sigma` / `high_sigma`; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = hybrid_images::DEFAULT_LEVELS)]
    levels: usize,
    #[command(flatten)]
    out: OutArgs,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value_t = 4.0)]
    sigma: f32,
    #[command(flatten)]
    out: OutArgs,
}

#[derive(Args, Debug, Clone)]
struct PyramidArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value_t = hybrid_images::DEFAULT_LEVELS)]
    levels: usize,
    #[command(flatten)]
    out: OutArgs,
}

#[derive(Args, Debug, Clone)]
struct KernelArgs {
    #[arg(long, required = true)]
    sigma: f32,
    #[command(flatten)]
    out: OutArgs,
}

#[derive(Debug, Clone, Serialize)]
struct MetaHybrid {
    low_input: String,
    high_input: String,
    params: HybridParams,
    width: usize,
    height: usize,
    scaled_levels: usize,
    scaled_size: [usize; 2],
    high_display_offset: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaFilter {
    operation: &'static str,
    input: String,
    sigma: f32,
    kernel_size: usize,
    border: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct MetaPyramid {
    input: String,
    levels: usize,
    level_offsets: Vec<[usize; 4]>,
    canvas_size: [usize; 2],
    policy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct KernelDto {
    sigma: f32,
    size: usize,
    sum: f32,
    weights: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaKernel {
    sigma: f32,
    size: usize,
    size_rule: &'static str,
    normalization: &'static str,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Hybrid(args) => run_hybrid(args),
        Command::LowPass(args) => run_low_pass(args),
        Command::HighPass(args) => run_high_pass(args),
        Command::Pyramid(args) => run_pyramid(args),
        Command::Kernel(args) => run_kernel(args),
    }
}

fn run_hybrid(args: HybridArgs) -> Result<()> {
    let params = resolve_params(&args)?;
    let low_img = load_input_rgb(&args.low)?;
    let high_img = load_input_rgb(&args.high)?;
    if low_img.dims() != high_img.dims() {
        bail!(
            "input dimensions differ: {} is {:?}, {} is {:?}.",
            args.low.display(),
            low_img.dims(),
            args.high.display(),
            high_img.dims()
        );
    }

    let case_dir = prepare_case(&args.out, "hybrid")?;
    let stages = compose(&low_img, &high_img, &params).context("composing hybrid image")?;
    let scaled = generate_scaled_images_with(&stages.hybrid, args.levels, &HalfSize)
        .context("building scaled canvas")?;

    save_rgb(case_dir.join("low.png"), &stages.low_pass)?;
    save_rgb(case_dir.join("high.png"), &display_high_pass(&stages.high_pass))?;
    save_rgb(case_dir.join("hybrid.png"), &stages.hybrid)?;
    save_rgb(case_dir.join("scaled.png"), &scaled.canvas)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaHybrid {
            low_input: args.low.display().to_string(),
            high_input: args.high.display().to_string(),
            params,
            width: stages.hybrid.width(),
            height: stages.hybrid.height(),
            scaled_levels: scaled.layout.placements.len(),
            scaled_size: [scaled.layout.width, scaled.layout.height],
            high_display_offset: hybrid_images::HIGH_PASS_DISPLAY_OFFSET,
        },
    )?;

    log::info!("wrote hybrid outputs to {}", case_dir.display());
    Ok(())
}

fn run_low_pass(args: FilterArgs) -> Result<()> {
    let img = load_input_rgb(&args.input)?;
    let kernel_size = gaussian_size(args.sigma).context("sizing gaussian kernel")?;
    let case_dir = prepare_case(&args.out, "low_pass")?;

    let low = make_low_pass(&img, args.sigma).context("low-pass filtering")?;
    save_rgb(case_dir.join("low.png"), &low)?;

    write_json(
        case_dir.join("meta.json"),
        &filter_meta("low_pass", &args, kernel_size),
    )
}

fn run_high_pass(args: FilterArgs) -> Result<()> {
    let img = load_input_rgb(&args.input)?;
    let kernel_size = gaussian_size(args.sigma).context("sizing gaussian kernel")?;
    let case_dir = prepare_case(&args.out, "high_pass")?;

    let high = make_high_pass(&img, args.sigma).context("high-pass filtering")?;
    save_rgb(case_dir.join("high.png"), &display_high_pass(&high))?;

    write_json(
        case_dir.join("meta.json"),
        &filter_meta("high_pass", &args, kernel_size),
    )
}

fn run_pyramid(args: PyramidArgs) -> Result<()> {
    let img = load_input_rgb(&args.input)?;
    let case_dir = prepare_case(&args.out, "pyramid")?;

    let scaled = generate_scaled_images_with(&img, args.levels, &HalfSize)
        .context("building scaled canvas")?;
    save_rgb(case_dir.join("scaled.png"), &scaled.canvas)?;

    write_json(
        case_dir.join("meta.json"),
        &MetaPyramid {
            input: args.input.display().to_string(),
            levels: args.levels,
            level_offsets: scaled
                .layout
                .placements
                .iter()
                .map(|p| [p.x, p.y, p.width, p.height])
                .collect(),
            canvas_size: [scaled.layout.width, scaled.layout.height],
            policy: "2x2 mean downsample with drop-odd dimensions, bottom-aligned",
        },
    )
}

fn run_kernel(args: KernelArgs) -> Result<()> {
    let kernel = gaussian_kernel(args.sigma).context("building gaussian kernel")?;
    let case_dir = prepare_case(&args.out, "kernel")?;

    write_json(
        case_dir.join("kernel.json"),
        &KernelDto {
            sigma: args.sigma,
            size: kernel.width(),
            sum: kernel.sum(),
            weights: kernel.to_rows(),
        },
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaKernel {
            sigma: args.sigma,
            size: kernel.width(),
            size_rule: "floor(8*sigma + 1), bumped to odd",
            normalization: "unit sum",
        },
    )
}

fn resolve_params(args: &HybridArgs) -> Result<HybridParams> {
    let mut params = match &args.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json::<HybridParams>(path)?
        }
        None => HybridParams::default(),
    };
    if let Some(s) = args.low_sigma {
        params.low_sigma = s;
    }
    if let Some(s) = args.high_sigma {
        params.high_sigma = s;
    }

    params
        .validate()
        .with_context(|| format!("invalid hybrid parameters {params:?}"))?;
    Ok(params)
}

fn filter_meta(operation: &'static str, args: &FilterArgs, kernel_size: usize) -> MetaFilter {
    MetaFilter {
        operation,
        input: args.input.display().to_string(),
        sigma: args.sigma,
        kernel_size,
        border: "zero",
    }
}

fn prepare_case(out: &OutArgs, case_name: &str) -> Result<PathBuf> {
    let case_dir = out.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;
    Ok(case_dir)
}

fn load_input_rgb(path: &Path) -> Result<ColorImage> {
    ensure_file_exists(path, "input")?;
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let (w, h) = (w as usize, h as usize);

    let bytes = rgb.into_raw();
    let view = ImageView::from_slice(w * 3, h, w * 3, &bytes)
        .with_context(|| format!("wrapping pixels of {}", path.display()))?;
    let unit = to_f32_unit(&view);

    ColorImage::from_interleaved(w, h, 3, unit.data())
        .with_context(|| format!("constructing color image from {}", path.display()))
}

fn save_rgb(path: PathBuf, img: &ColorImage) -> Result<()> {
    let rgb = match img.num_channels() {
        3 => img.clone(),
        1 => {
            let plane = img.planes()[0].clone();
            ColorImage::from_planes(vec![plane.clone(), plane.clone(), plane])?
        }
        n => bail!("cannot save {n}-channel image as RGB: {}", path.display()),
    };

    let (w, h) = rgb.dims();
    let interleaved = Image::from_vec(w * 3, h, rgb.to_interleaved())
        .context("packing interleaved samples")?;
    let bytes = to_u8_clamped(&interleaved.as_view()).into_vec();

    let out = RgbImage::from_raw(w as u32, h as u32, bytes)
        .context("constructing RgbImage from raw bytes")?;
    out.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

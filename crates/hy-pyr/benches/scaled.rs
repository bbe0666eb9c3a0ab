use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hy_core::{ColorImage, Image};
use hy_pyr::{downsample2x2_mean_f32, generate_scaled_images};

fn build_rgb(width: usize, height: usize) -> ColorImage {
    let planes = (0..3)
        .map(|c| Image::from_fn(width, height, |x, y| ((x + y + c * 17) % 251) as f32 / 250.0))
        .collect();
    ColorImage::from_planes(planes).expect("valid image")
}

fn bench_downsample_f32(c: &mut Criterion) {
    let img = build_rgb(1280, 1024);
    let plane = img.plane(0).expect("red plane");
    let view = plane.as_view();

    c.bench_function("downsample2x2_mean_f32_1280x1024", |b| {
        b.iter(|| {
            let out = downsample2x2_mean_f32(black_box(&view));
            black_box(out);
        });
    });
}

fn bench_scaled_canvas(c: &mut Criterion) {
    let img = build_rgb(1280, 1024);

    c.bench_function("generate_scaled_images_rgb_1280x1024", |b| {
        b.iter(|| {
            let canvas = generate_scaled_images(black_box(&img)).expect("valid image");
            black_box(canvas.width());
        });
    });
}

criterion_group!(benches, bench_downsample_f32, bench_scaled_canvas);
criterion_main!(benches);

use hy_core::{Image, ImageView};

#[inline]
fn dst_dims(src_w: usize, src_h: usize) -> (usize, usize) {
    (src_w / 2, src_h / 2)
}

/// Half-size reduction by 2x2 block mean. Odd trailing rows/columns are
/// dropped.
pub fn downsample2x2_mean_f32(src: &ImageView<'_, f32>) -> Image<f32> {
    let (dst_w, dst_h) = dst_dims(src.width(), src.height());
    let mut dst = Image::new_fill(dst_w, dst_h, 0.0f32);
    downsample2x2_mean_f32_into(src, &mut dst);
    dst
}

pub(crate) fn downsample2x2_mean_f32_into(src: &ImageView<'_, f32>, dst: &mut Image<f32>) {
    let (dst_w, dst_h) = dst_dims(src.width(), src.height());
    debug_assert_eq!(dst.width(), dst_w);
    debug_assert_eq!(dst.height(), dst_h);

    if dst_w == 0 || dst_h == 0 {
        return;
    }

    if src.is_contiguous()
        && src.width().is_multiple_of(2)
        && let Some(src_contig) = src.as_contiguous_slice()
    {
        downsample_f32_contiguous_even(src_contig, src.width(), dst.data_mut(), dst_w);
        return;
    }

    downsample_f32_fallback(src, dst.data_mut(), dst_w, dst_h);
}

fn downsample_f32_contiguous_even(src: &[f32], src_w: usize, dst: &mut [f32], dst_w: usize) {
    // Pairs of source rows map onto one destination row; a trailing odd row
    // is never visited because `dst` has exactly `src_h / 2` rows.
    for (dst_row, src_rows) in dst
        .chunks_exact_mut(dst_w)
        .zip(src.chunks_exact(2 * src_w))
    {
        let (row0, row1) = src_rows.split_at(src_w);
        for (x, out) in dst_row.iter_mut().enumerate() {
            let sx = 2 * x;
            *out = (row0[sx] + row0[sx + 1] + row1[sx] + row1[sx + 1]) * 0.25;
        }
    }
}

fn downsample_f32_fallback(src: &ImageView<'_, f32>, dst: &mut [f32], dst_w: usize, dst_h: usize) {
    for y in 0..dst_h {
        let src_row0 = src.row(2 * y);
        let src_row1 = src.row(2 * y + 1);
        let dst_row = &mut dst[y * dst_w..(y + 1) * dst_w];
        for (x, out) in dst_row.iter_mut().enumerate() {
            let sx = 2 * x;
            *out = (src_row0[sx] + src_row0[sx + 1] + src_row1[sx] + src_row1[sx + 1]) * 0.25;
        }
    }
}

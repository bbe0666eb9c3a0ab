use crate::{ImageView, ImageViewMut};

/// Copies `src` into `dst` with its top-left corner at `(x, y)`.
///
/// The source is clipped against the destination, so offsets may be negative
/// or push the source partly (or entirely) outside. Returns the number of
/// pixels written.
pub fn blit<T: Copy>(
    dst: &mut ImageViewMut<'_, T>,
    src: &ImageView<'_, T>,
    x: isize,
    y: isize,
) -> usize {
    let dst_w = dst.width() as isize;
    let dst_h = dst.height() as isize;

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + src.width() as isize).min(dst_w);
    let y1 = (y + src.height() as isize).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return 0;
    }

    let sx = (x0 - x) as usize;
    let span = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let src_row = &src.row(sy)[sx..sx + span];
        let dst_row = dst.row_mut(dy as usize);
        dst_row[x0 as usize..x0 as usize + span].copy_from_slice(src_row);
    }

    span * (y1 - y0) as usize
}

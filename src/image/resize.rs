//! Bilinear resampling for grayscale images.

use crate::image::{Image, ImageView};

/// Precomputed source taps for one output coordinate.
#[derive(Clone, Copy)]
struct Tap {
    i0: usize,
    i1: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let max = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let s = ((d as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (s.floor() as usize).min(max);
            let i1 = (i0 + 1).min(max);
            let frac = if i0 == max { 0.0 } else { s - i0 as f32 };
            Tap { i0, i1, frac }
        })
        .collect()
}

/// Resizes a grayscale image using bilinear sampling.
///
/// Destination pixel centers are mapped onto the source grid with
/// `src = (dst + 0.5) * (src_len / dst_len) - 0.5`, and samples are clamped to
/// the source edges. Values are rounded to the nearest integer. A zero target
/// dimension is bumped to one pixel.
pub fn resize_bilinear(src: ImageView<'_, u8>, width: usize, height: usize) -> Image {
    let width = width.max(1);
    let height = height.max(1);
    if (width, height) == src.dimensions() {
        return src.to_image();
    }

    let xs = taps(src.width(), width);
    let ys = taps(src.height(), height);
    let mut out = Vec::with_capacity(width * height);
    for ty in &ys {
        let row0 = src.row(ty.i0).expect("row tap within bounds");
        let row1 = src.row(ty.i1).expect("row tap within bounds");
        for tx in &xs {
            let a = row0[tx.i0] as f32;
            let b = row0[tx.i1] as f32;
            let c = row1[tx.i0] as f32;
            let d = row1[tx.i1] as f32;
            let top = a + (b - a) * tx.frac;
            let bottom = c + (d - c) * tx.frac;
            let value = top + (bottom - top) * ty.frac;
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    Image::new(out, width, height).expect("resize output is contiguous")
}

/// Resizes `test` to `width x height` unless it already has those dimensions.
///
/// Returns `None` when no resampling is needed so callers can keep borrowing
/// the original view.
pub fn resize_if_needed(test: ImageView<'_, u8>, width: usize, height: usize) -> Option<Image> {
    if test.dimensions() == (width, height) {
        None
    } else {
        Some(resize_bilinear(test, width, height))
    }
}

//! Separable convolution helpers.
//!
//! Two flavours are needed: a "valid" filter over `f32` planes that only
//! produces outputs whose support lies fully inside the input (SSIM windows),
//! and a same-size `u8` blur with reflect-101 borders (descriptor smoothing).

use crate::image::{Image, ImageView};
use crate::util::math::gaussian_kernel;

/// Dense row-major `f32` plane.
pub(crate) struct FloatPlane {
    pub(crate) data: Vec<f32>,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl FloatPlane {
    pub(crate) fn from_view(view: ImageView<'_, u8>) -> Self {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for row in view.rows() {
            data.extend(row.iter().map(|&v| v as f32));
        }
        Self {
            data,
            width: view.width(),
            height: view.height(),
        }
    }

    /// Element-wise product of two planes of equal size.
    pub(crate) fn product(&self, other: &FloatPlane) -> FloatPlane {
        debug_assert_eq!(self.data.len(), other.data.len());
        FloatPlane {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a * b)
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Filters with a separable kernel, keeping only fully supported outputs.
    ///
    /// Requires `kernel.len() <= width` and `kernel.len() <= height`.
    pub(crate) fn filter_valid(&self, kernel: &[f32]) -> FloatPlane {
        let k = kernel.len();
        let out_w = self.width + 1 - k;
        let out_h = self.height + 1 - k;

        let mut horizontal = vec![0.0f32; out_w * self.height];
        for y in 0..self.height {
            let src = &self.data[y * self.width..(y + 1) * self.width];
            let dst = &mut horizontal[y * out_w..(y + 1) * out_w];
            for (x, out) in dst.iter_mut().enumerate() {
                *out = src[x..x + k]
                    .iter()
                    .zip(kernel.iter())
                    .map(|(v, w)| v * w)
                    .sum();
            }
        }

        let mut data = vec![0.0f32; out_w * out_h];
        for (i, &w) in kernel.iter().enumerate() {
            for y in 0..out_h {
                let src = &horizontal[(y + i) * out_w..(y + i + 1) * out_w];
                let dst = &mut data[y * out_w..(y + 1) * out_w];
                for (d, s) in dst.iter_mut().zip(src.iter()) {
                    *d += w * s;
                }
            }
        }

        FloatPlane {
            data,
            width: out_w,
            height: out_h,
        }
    }
}

/// Maps an out-of-range coordinate back inside `[0, len)` by reflect-101.
fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = i;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * (len - 1) - i;
        }
    }
    i as usize
}

/// Gaussian blur preserving size, with reflect-101 border handling.
pub(crate) fn gaussian_blur(src: ImageView<'_, u8>, size: usize, sigma: f32) -> Image {
    let kernel = gaussian_kernel(size, sigma);
    let half = (kernel.len() / 2) as isize;
    let (width, height) = src.dimensions();

    let mut horizontal = vec![0.0f32; width * height];
    for (y, row) in src.rows().enumerate() {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, w) in kernel.iter().enumerate() {
                let sx = reflect101(x as isize + i as isize - half, width);
                acc += w * row[sx] as f32;
            }
            horizontal[y * width + x] = acc;
        }
    }

    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, w) in kernel.iter().enumerate() {
                let sy = reflect101(y as isize + i as isize - half, height);
                acc += w * horizontal[sy * width + x];
            }
            out.push(acc.round().clamp(0.0, 255.0) as u8);
        }
    }

    Image::new(out, width, height).expect("blur output is contiguous")
}

//! Scale pyramid construction for grayscale `u8` images.
//!
//! Level `i` has scale `factor^i` relative to the base and is produced by
//! bilinear downsampling of level `i - 1` to `round(base / factor^i)`. The
//! pyramid stops early once a level would drop below `min_side` pixels in
//! either dimension.

use crate::image::resize::resize_bilinear;
use crate::image::{Image, ImageView};

/// One pyramid level together with its scale relative to the base image.
pub(crate) struct PyramidLevel {
    pub(crate) image: Image,
    pub(crate) scale: f32,
}

/// Owned scale pyramid built from a base level.
pub(crate) struct ScalePyramid {
    levels: Vec<PyramidLevel>,
}

impl ScalePyramid {
    /// Builds up to `max_levels` levels (at least the base).
    pub(crate) fn build(
        base: ImageView<'_, u8>,
        max_levels: usize,
        factor: f32,
        min_side: usize,
    ) -> Self {
        let max_levels = max_levels.max(1);
        let factor = if factor > 1.0 { factor } else { 1.0 };
        let (base_w, base_h) = base.dimensions();

        let mut levels = vec![PyramidLevel {
            image: base.to_image(),
            scale: 1.0,
        }];
        while levels.len() < max_levels {
            let scale = factor.powi(levels.len() as i32);
            let width = (base_w as f32 / scale).round() as usize;
            let height = (base_h as f32 / scale).round() as usize;
            if width < min_side || height < min_side {
                break;
            }
            let prev = levels.last().expect("levels is not empty");
            let image = resize_bilinear(prev.image.view(), width, height);
            levels.push(PyramidLevel { image, scale });
        }

        Self { levels }
    }

    /// Returns all levels (level 0 is the base resolution).
    pub(crate) fn levels(&self) -> &[PyramidLevel] {
        &self.levels
    }
}

//! Structural similarity (SSIM) over Gaussian-weighted windows.
//!
//! Local means, variances and covariance are obtained by filtering the two
//! images (and their squares and product) with a separable window. Only
//! windows lying fully inside the image contribute. The global index is the
//! mean of the per-window SSIM values and lies in `[-1, 1]`.

use crate::compare::ComparisonMethod;
use crate::image::filter::FloatPlane;
use crate::image::resize::resize_if_needed;
use crate::image::{Image, ImageView};
use crate::scorer::Scorer;
use crate::trace::{trace_event, trace_span};
use crate::util::math::gaussian_kernel;
use crate::util::{LabelMatchError, LabelMatchResult};

/// Parameters of the SSIM index.
#[derive(Clone, Debug)]
pub struct SsimConfig {
    /// Side of the square window; forced to be odd.
    pub window_size: usize,
    /// Gaussian standard deviation of the window weights.
    pub sigma: f32,
    /// Use Gaussian weights; uniform weights otherwise.
    pub gaussian_weights: bool,
    /// Luminance stabilizer coefficient.
    pub k1: f32,
    /// Contrast stabilizer coefficient.
    pub k2: f32,
    /// Dynamic range of the pixel values.
    pub data_range: f32,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            window_size: 11,
            sigma: 1.5,
            gaussian_weights: true,
            k1: 0.01,
            k2: 0.03,
            data_range: 255.0,
        }
    }
}

impl SsimConfig {
    fn window(&self) -> Vec<f32> {
        let size = self.window_size.max(1) | 1;
        if self.gaussian_weights {
            gaussian_kernel(size, self.sigma)
        } else {
            vec![1.0 / size as f32; size]
        }
    }
}

/// Mean SSIM of two equal-sized images.
pub fn ssim_index(
    reference: ImageView<'_, u8>,
    test: ImageView<'_, u8>,
    cfg: &SsimConfig,
) -> LabelMatchResult<f32> {
    if reference.dimensions() != test.dimensions() {
        return Err(LabelMatchError::Scorer {
            method: ComparisonMethod::StructuralSimilarity,
            reason: format!(
                "dimension mismatch {:?} vs {:?}",
                reference.dimensions(),
                test.dimensions()
            ),
        });
    }
    let window = cfg.window();
    let (width, height) = reference.dimensions();
    if width < window.len() || height < window.len() {
        return Err(LabelMatchError::ImageTooSmall {
            width,
            height,
            min: window.len(),
        });
    }

    let x = FloatPlane::from_view(reference);
    let y = FloatPlane::from_view(test);
    let mu_x = x.filter_valid(&window);
    let mu_y = y.filter_valid(&window);
    let xx = x.product(&x).filter_valid(&window);
    let yy = y.product(&y).filter_valid(&window);
    let xy = x.product(&y).filter_valid(&window);

    let c1 = (cfg.k1 * cfg.data_range).powi(2);
    let c2 = (cfg.k2 * cfg.data_range).powi(2);
    let mut sum = 0.0f64;
    for i in 0..mu_x.data.len() {
        let mx = mu_x.data[i];
        let my = mu_y.data[i];
        let sxx = xx.data[i] - mx * mx;
        let syy = yy.data[i] - my * my;
        let sxy = xy.data[i] - mx * my;
        let numerator = (2.0 * mx * my + c1) * (2.0 * sxy + c2);
        let denominator = (mx * mx + my * my + c1) * (sxx + syy + c2);
        sum += (numerator / denominator) as f64;
    }

    Ok((sum / mu_x.data.len() as f64) as f32)
}

/// Structural similarity scorer; resizes `test` to the reference size first.
#[derive(Clone, Debug, Default)]
pub struct StructuralSimilarityScorer {
    cfg: SsimConfig,
}

impl StructuralSimilarityScorer {
    /// Creates a scorer with the given parameters.
    pub fn new(cfg: SsimConfig) -> Self {
        Self { cfg }
    }
}

impl Scorer for StructuralSimilarityScorer {
    fn raw_score(
        &self,
        reference: ImageView<'_, u8>,
        test: ImageView<'_, u8>,
    ) -> LabelMatchResult<f32> {
        let _span = trace_span!("ssim").entered();
        let resized = resize_if_needed(test, reference.width(), reference.height());
        let test = resized.as_ref().map_or(test, Image::view);
        let index = ssim_index(reference, test, &self.cfg)?;
        trace_event!("ssim_index", index = index);
        Ok(index)
    }
}

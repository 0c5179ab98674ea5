//! Zero-mean normalized cross-correlation of equal-sized images.
//!
//! The test image is resized to the reference size, so the correlation
//! surface of a template search collapses to a single placement. The score
//! is that one global coefficient in `[-1, 1]`; no spatial search happens.

use crate::compare::ComparisonMethod;
use crate::image::resize::resize_if_needed;
use crate::image::{Image, ImageView};
use crate::scorer::Scorer;
use crate::trace::{trace_event, trace_span};
use crate::util::{LabelMatchError, LabelMatchResult};

/// Precomputed statistics and zero-mean buffer of one image.
pub struct CorrelationPlan {
    width: usize,
    height: usize,
    mean: f64,
    norm: f64,
    zero_mean: Vec<f64>,
}

impl CorrelationPlan {
    /// Builds a plan, rejecting images without intensity variation.
    pub fn from_view(view: ImageView<'_, u8>) -> LabelMatchResult<Self> {
        let (width, height) = view.dimensions();
        let count = (width * height) as f64;

        let mut sum = 0.0f64;
        for row in view.rows() {
            sum += row.iter().map(|&v| v as f64).sum::<f64>();
        }
        let mean = sum / count;

        let mut zero_mean = Vec::with_capacity(width * height);
        let mut sum_sq = 0.0f64;
        for row in view.rows() {
            for &value in row {
                let d = value as f64 - mean;
                sum_sq += d * d;
                zero_mean.push(d);
            }
        }
        if sum_sq / count <= 1e-8 {
            return Err(LabelMatchError::DegenerateImage {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mean,
            norm: sum_sq.sqrt(),
            zero_mean,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the zero-mean buffer in row-major order.
    pub fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }

    /// Correlation coefficient with another plan of the same size.
    pub fn correlate(&self, other: &CorrelationPlan) -> LabelMatchResult<f32> {
        if (self.width, self.height) != (other.width, other.height) {
            return Err(LabelMatchError::Scorer {
                method: ComparisonMethod::TemplateCorrelation,
                reason: format!(
                    "dimension mismatch {}x{} vs {}x{}",
                    self.width, self.height, other.width, other.height
                ),
            });
        }
        let dot: f64 = self
            .zero_mean
            .iter()
            .zip(other.zero_mean.iter())
            .map(|(a, b)| a * b)
            .sum();
        Ok((dot / (self.norm * other.norm)) as f32)
    }
}

/// Global normalized cross-correlation scorer.
#[derive(Clone, Debug, Default)]
pub struct TemplateCorrelationScorer;

impl Scorer for TemplateCorrelationScorer {
    fn raw_score(
        &self,
        reference: ImageView<'_, u8>,
        test: ImageView<'_, u8>,
    ) -> LabelMatchResult<f32> {
        let _span = trace_span!("template_correlation").entered();
        let resized = resize_if_needed(test, reference.width(), reference.height());
        let test = resized.as_ref().map_or(test, Image::view);
        let coefficient =
            CorrelationPlan::from_view(reference)?.correlate(&CorrelationPlan::from_view(test)?)?;
        trace_event!("correlation", coefficient = coefficient);
        Ok(coefficient)
    }
}

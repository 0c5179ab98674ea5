//! Similarity scorers.
//!
//! Every scorer is a pure function of two grayscale views. `raw_score`
//! returns the algorithm's native value; `score` clamps it into `[0, 1]`.

use crate::image::ImageView;
use crate::util::math::clamp_unit;
use crate::util::LabelMatchResult;

pub mod orb;
pub mod ssim;
pub mod template;

pub use orb::FeatureMatchScorer;
pub use ssim::{SsimConfig, StructuralSimilarityScorer};
pub use template::TemplateCorrelationScorer;

/// Scorer trait implemented by each comparison method.
pub trait Scorer: Send + Sync {
    /// Computes the unclamped similarity of `test` against `reference`.
    fn raw_score(
        &self,
        reference: ImageView<'_, u8>,
        test: ImageView<'_, u8>,
    ) -> LabelMatchResult<f32>;

    /// Computes the similarity clamped into `[0, 1]`.
    fn score(&self, reference: ImageView<'_, u8>, test: ImageView<'_, u8>) -> LabelMatchResult<f32> {
        self.raw_score(reference, test).map(clamp_unit)
    }
}

//! Keypoint-based similarity.
//!
//! Score = good cross-checked matches / max(keypoints in either image, 1),
//! where a match is good when its Hamming distance is below
//! `OrbConfig::max_match_distance`. Images of different sizes are compared
//! as-is; the detector is scale tolerant.

use crate::feature::{cross_check_matches, detect_and_compute, OrbConfig};
use crate::image::ImageView;
use crate::scorer::Scorer;
use crate::trace::{trace_event, trace_span};
use crate::util::LabelMatchResult;

/// Feature matching scorer.
#[derive(Clone, Debug, Default)]
pub struct FeatureMatchScorer {
    cfg: OrbConfig,
}

impl FeatureMatchScorer {
    /// Creates a scorer with the given detector and matching parameters.
    pub fn new(cfg: OrbConfig) -> Self {
        Self { cfg }
    }
}

impl Scorer for FeatureMatchScorer {
    fn raw_score(
        &self,
        reference: ImageView<'_, u8>,
        test: ImageView<'_, u8>,
    ) -> LabelMatchResult<f32> {
        let _span = trace_span!("feature_match").entered();
        let ref_features = detect_and_compute(reference, &self.cfg);
        let test_features = detect_and_compute(test, &self.cfg);
        if ref_features.is_empty() || test_features.is_empty() {
            trace_event!(
                "no_descriptors",
                reference = ref_features.len(),
                test = test_features.len()
            );
            return Ok(0.0);
        }

        let good = cross_check_matches(&ref_features.descriptors, &test_features.descriptors)
            .iter()
            .filter(|m| m.distance < self.cfg.max_match_distance)
            .count();
        let denom = ref_features.len().max(test_features.len()).max(1);
        trace_event!(
            "matches",
            good = good,
            reference = ref_features.len(),
            test = test_features.len()
        );
        Ok((good as f32 / denom as f32).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureMatchScorer;
    use crate::image::Image;
    use crate::scorer::Scorer;

    fn squares(width: usize, height: usize) -> Image {
        Image::from_fn(width, height, |x, y| {
            let (cx, cy) = (x / 14, y / 14);
            if x % 14 < 8 && y % 14 < 8 {
                (60 + (cx * 37 + cy * 53) % 190) as u8
            } else {
                15
            }
        })
        .unwrap()
    }

    #[test]
    fn flat_images_score_zero_without_error() {
        let flat = Image::from_fn(120, 120, |_, _| 128).unwrap();
        let textured = squares(120, 120);
        let scorer = FeatureMatchScorer::default();
        assert_eq!(scorer.score(flat.view(), textured.view()).unwrap(), 0.0);
        assert_eq!(scorer.score(flat.view(), flat.view()).unwrap(), 0.0);
    }

    #[test]
    fn identical_images_match_most_keypoints() {
        let img = squares(160, 140);
        let score = FeatureMatchScorer::default()
            .score(img.view(), img.view())
            .unwrap();
        assert!(score > 0.5, "score {score}");
    }
}

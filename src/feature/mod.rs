//! Oriented FAST keypoints with steered binary descriptors.
//!
//! Detection runs over a scale pyramid. On each level FAST-9 candidates are
//! found away from the border, ranked by Harris response, and the strongest
//! ones are kept according to a per-level quota that decays geometrically
//! with scale. Each kept corner gets an orientation from its intensity
//! centroid and a 256-bit descriptor sampled on a Gaussian-smoothed copy of
//! the level, steered by that orientation.

mod fast;
mod harris;
pub mod matcher;
mod orb;
mod pattern;

use crate::candidate::topk::retain_best;
use crate::image::filter::gaussian_blur;
use crate::image::pyramid::ScalePyramid;
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};

use fast::detect_fast9;
use harris::{harris_response, HARRIS_BLOCK};
use orb::{intensity_centroid_angle, steered_descriptor};
use pattern::PATTERN_EXTENT;

pub use matcher::{cross_check_matches, DescriptorMatch};

/// Smallest border that keeps every steered pattern sample inside the image.
const MIN_BORDER: usize = (PATTERN_EXTENT as usize * 3 + 1) / 2 + 1;

/// 256-bit binary descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Descriptor(pub [u8; 32]);

impl Descriptor {
    /// Number of differing bits.
    pub fn hamming(&self, other: &Descriptor) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Oriented keypoint in base-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// X coordinate in the base image.
    pub x: f32,
    /// Y coordinate in the base image.
    pub y: f32,
    /// Harris response used for ranking.
    pub response: f32,
    /// Orientation in degrees, `[0, 360)`.
    pub angle_deg: f32,
    /// Pyramid level the keypoint was detected on.
    pub octave: usize,
}

/// Keypoints and their descriptors; `descriptors[i]` belongs to `keypoints[i]`.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    /// Number of keypoints (always equal to the number of descriptors).
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Returns true when nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Configuration for keypoint detection and descriptor matching.
#[derive(Clone, Debug)]
pub struct OrbConfig {
    /// Maximum number of keypoints retained per image.
    pub max_features: usize,
    /// Number of pyramid levels.
    pub levels: usize,
    /// Downscale factor between consecutive levels.
    pub scale_factor: f32,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Keypoints closer than this to a border are discarded.
    pub edge_threshold: usize,
    /// Side of the square patch used for orientation.
    pub patch_size: usize,
    /// Matches with a Hamming distance below this value count as good.
    pub max_match_distance: u32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            levels: 8,
            scale_factor: 1.2,
            fast_threshold: 20,
            edge_threshold: 31,
            patch_size: 31,
            max_match_distance: 50,
        }
    }
}

impl OrbConfig {
    /// Border kept free of keypoints on every level.
    fn border(&self) -> usize {
        self.edge_threshold
            .max(self.patch_size / 2 + 1)
            .max(HARRIS_BLOCK / 2 + 2)
            .max(MIN_BORDER)
    }

    /// Splits `max_features` over the levels with ratio `1 / scale_factor`.
    pub(crate) fn level_quotas(&self) -> Vec<usize> {
        let levels = self.levels.max(1);
        let factor = if self.scale_factor > 1.0 {
            1.0 / self.scale_factor as f64
        } else {
            1.0
        };
        let total = self.max_features;
        let mut desired = if (factor - 1.0).abs() < f64::EPSILON {
            total as f64 / levels as f64
        } else {
            total as f64 * (1.0 - factor) / (1.0 - factor.powi(levels as i32))
        };

        let mut quotas = Vec::with_capacity(levels);
        let mut assigned = 0usize;
        for _ in 0..levels - 1 {
            let n = (desired.round() as usize).min(total - assigned);
            quotas.push(n);
            assigned += n;
            desired *= factor;
        }
        quotas.push(total - assigned);
        quotas
    }
}

/// Detects up to `cfg.max_features` keypoints and computes their descriptors.
pub fn detect_and_compute(image: ImageView<'_, u8>, cfg: &OrbConfig) -> FeatureSet {
    let _span = trace_span!(
        "detect_and_compute",
        width = image.width(),
        height = image.height()
    )
    .entered();

    let border = cfg.border();
    let radius = cfg.patch_size / 2;
    let pyramid = ScalePyramid::build(image, cfg.levels, cfg.scale_factor, 2 * border + 1);
    let quotas = cfg.level_quotas();

    let mut features = FeatureSet::default();
    for (octave, level) in pyramid.levels().iter().enumerate() {
        let quota = quotas.get(octave).copied().unwrap_or(0);
        if quota == 0 {
            continue;
        }
        let view = level.image.view();
        let mut corners = detect_fast9(view, cfg.fast_threshold, border);
        for corner in corners.iter_mut() {
            corner.response = harris_response(view, corner.x, corner.y);
        }
        retain_best(&mut corners, quota);
        if corners.is_empty() {
            continue;
        }

        let smoothed = gaussian_blur(view, 7, 2.0);
        for corner in corners {
            let angle_deg = intensity_centroid_angle(view, corner.x, corner.y, radius);
            features.descriptors.push(steered_descriptor(
                smoothed.view(),
                corner.x,
                corner.y,
                angle_deg,
            ));
            features.keypoints.push(Keypoint {
                x: corner.x as f32 * level.scale,
                y: corner.y as f32 * level.scale,
                response: corner.response,
                angle_deg,
                octave,
            });
        }
    }

    trace_event!("keypoints_detected", count = features.len());
    features
}

#[cfg(test)]
mod tests {
    use super::{detect_and_compute, Descriptor, OrbConfig};
    use crate::image::Image;

    #[test]
    fn level_quotas_sum_to_budget() {
        let cfg = OrbConfig::default();
        let quotas = cfg.level_quotas();
        assert_eq!(quotas.len(), 8);
        assert_eq!(quotas.iter().sum::<usize>(), 1000);
        assert!(quotas.windows(2).take(6).all(|w| w[0] >= w[1]));
        assert_eq!(quotas[0], 217);
    }

    #[test]
    fn hamming_counts_bits() {
        let a = Descriptor([0u8; 32]);
        let mut bits = [0u8; 32];
        bits[0] = 0b1011;
        bits[31] = 0xFF;
        assert_eq!(a.hamming(&Descriptor(bits)), 11);
    }

    #[test]
    fn flat_image_yields_no_features() {
        let img = Image::from_fn(128, 128, |_, _| 90).unwrap();
        let features = detect_and_compute(img.view(), &OrbConfig::default());
        assert!(features.is_empty());
    }

    #[test]
    fn respects_feature_cap() {
        let img = Image::from_fn(200, 200, |x, y| {
            if x % 16 < 8 && y % 16 < 8 {
                210
            } else {
                25
            }
        })
        .unwrap();
        let cfg = OrbConfig {
            max_features: 50,
            ..OrbConfig::default()
        };
        let features = detect_and_compute(img.view(), &cfg);
        assert!(!features.is_empty());
        assert!(features.len() <= 50);
        assert_eq!(features.keypoints.len(), features.descriptors.len());
        for kp in &features.keypoints {
            assert!(kp.x >= 31.0 && kp.y >= 31.0);
            assert!(kp.x < 169.0 && kp.y < 169.0);
        }
    }
}

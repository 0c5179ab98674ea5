//! LabelMatch scores how similar a test image is to a reference image.
//!
//! Three methods are available: structural similarity (SSIM), oriented
//! keypoint matching and global normalized cross-correlation. Each yields a
//! score in `[0, 1]`. A [`Comparator`] runs one method or all of them and
//! picks the best, turning failures into zero-score results instead of
//! errors. Decoding from files or URLs lives behind the `image-io` and
//! `http` features; batch comparisons can use the `rayon` feature.

mod candidate;
pub mod compare;
pub mod feature;
pub mod image;
pub mod scorer;
mod trace;
pub mod util;

pub use compare::{Comparator, ComparatorConfig, ComparisonMethod, ComparisonReport, ScoreResult};
pub use feature::{FeatureSet, OrbConfig};
pub use image::{Image, ImageView};
pub use scorer::{
    FeatureMatchScorer, Scorer, SsimConfig, StructuralSimilarityScorer, TemplateCorrelationScorer,
};
pub use util::{LabelMatchError, LabelMatchResult};

#[cfg(feature = "image-io")]
pub use image::io::{load, load_bytes, load_path, ImageSource};

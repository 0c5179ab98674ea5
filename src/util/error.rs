//! Error types for labelmatch.

use crate::compare::ComparisonMethod;
use thiserror::Error;

/// Result alias for labelmatch operations.
pub type LabelMatchResult<T> = std::result::Result<T, LabelMatchError>;

/// Errors that can occur when loading images or running similarity scorers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LabelMatchError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not hold enough elements.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The image source could not be read or decoded.
    #[error("failed to load image {origin}: {reason}")]
    Load { origin: String, reason: String },
    /// The requested comparison method is not known.
    #[error("unsupported comparison method '{name}'")]
    UnsupportedMethod { name: String },
    /// The image has no intensity variation where the metric needs some.
    #[error("degenerate image: {reason}")]
    DegenerateImage { reason: &'static str },
    /// The image is smaller than the scorer's analysis window.
    #[error("image {width}x{height} is smaller than the {min}x{min} window")]
    ImageTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    /// A scorer failed for a reason specific to its algorithm.
    #[error("{method} scorer failed: {reason}")]
    Scorer {
        method: ComparisonMethod,
        reason: String,
    },
}

impl LabelMatchError {
    pub(crate) fn load(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

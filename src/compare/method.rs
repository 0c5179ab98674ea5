//! The closed set of comparison methods.

use crate::util::LabelMatchError;
use std::fmt;
use std::str::FromStr;

/// Similarity algorithm selector.
///
/// Declaration order is the tie-break priority: when two methods score the
/// same, the earlier one wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonMethod {
    /// Gaussian-windowed structural similarity (SSIM).
    StructuralSimilarity,
    /// Oriented keypoints with cross-checked binary descriptor matching.
    FeatureMatch,
    /// Global zero-mean normalized cross-correlation.
    TemplateCorrelation,
}

impl ComparisonMethod {
    /// All methods in priority order.
    pub const ALL: [ComparisonMethod; 3] = [
        ComparisonMethod::StructuralSimilarity,
        ComparisonMethod::FeatureMatch,
        ComparisonMethod::TemplateCorrelation,
    ];

    /// Canonical short name used on the command line and in JSON output.
    pub fn name(self) -> &'static str {
        match self {
            ComparisonMethod::StructuralSimilarity => "ssim",
            ComparisonMethod::FeatureMatch => "orb",
            ComparisonMethod::TemplateCorrelation => "template",
        }
    }
}

impl fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComparisonMethod {
    type Err = LabelMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonMethod::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| LabelMatchError::UnsupportedMethod {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::ComparisonMethod;
    use crate::util::LabelMatchError;

    #[test]
    fn names_round_trip() {
        for method in ComparisonMethod::ALL {
            assert_eq!(method.name().parse::<ComparisonMethod>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "sift".parse::<ComparisonMethod>().unwrap_err();
        assert_eq!(
            err,
            LabelMatchError::UnsupportedMethod {
                name: "sift".to_string()
            }
        );
        assert!("SSIM".parse::<ComparisonMethod>().is_err());
    }

    #[test]
    fn ordering_follows_priority() {
        let mut methods = vec![
            ComparisonMethod::TemplateCorrelation,
            ComparisonMethod::StructuralSimilarity,
            ComparisonMethod::FeatureMatch,
        ];
        methods.sort();
        assert_eq!(methods, ComparisonMethod::ALL.to_vec());
    }
}

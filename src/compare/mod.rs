//! Comparison orchestration: dispatch, failure downgrade and best-of-N.
//!
//! `Comparator` holds one stateless scorer per method, built once from a
//! `ComparatorConfig`. Scorer and loader failures never escape: they are
//! turned into results with `score = 0`, `success = false` and a message.
//! `compare_all` picks the best method with a stable linear scan over
//! `ComparisonMethod::ALL`, so ties resolve to the earlier method.

mod method;

pub use method::ComparisonMethod;

use crate::feature::OrbConfig;
use crate::image::Image;
use crate::scorer::{
    FeatureMatchScorer, Scorer, SsimConfig, StructuralSimilarityScorer, TemplateCorrelationScorer,
};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::math::{clamp_unit, round_to};
use std::collections::BTreeMap;

#[cfg(feature = "image-io")]
use crate::image::io::{load, ImageSource};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Decimal places at which scores are reported and compared.
pub const SCORE_DECIMALS: i32 = 4;

/// Outcome of one method on one image pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreResult {
    method: ComparisonMethod,
    score: f32,
    success: bool,
    error: Option<String>,
}

impl ScoreResult {
    /// A successful result; the score is clamped into `[0, 1]`.
    pub fn succeeded(method: ComparisonMethod, score: f32) -> Self {
        Self {
            method,
            score: clamp_unit(score),
            success: true,
            error: None,
        }
    }

    /// A failed result with score 0.
    pub fn failed(method: ComparisonMethod, error: impl Into<String>) -> Self {
        Self {
            method,
            score: 0.0,
            success: false,
            error: Some(error.into()),
        }
    }

    /// The method that produced this result.
    pub fn method(&self) -> ComparisonMethod {
        self.method
    }

    /// Similarity in `[0, 1]`.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Similarity in percent, `[0, 100]`.
    pub fn score_percentage(&self) -> f32 {
        round_to(self.score * 100.0, SCORE_DECIMALS)
    }

    /// Whether the scorer ran to completion.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Failure description, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome of all methods on one image pair.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    best_method: ComparisonMethod,
    results: BTreeMap<ComparisonMethod, ScoreResult>,
}

impl ComparisonReport {
    /// Builds a report from one result per method.
    ///
    /// The best method is the first maximum in priority order, comparing
    /// scores at their reported precision of 4 decimals; methods missing
    /// from `results` are skipped.
    fn from_results(results: BTreeMap<ComparisonMethod, ScoreResult>) -> Self {
        let mut best: Option<&ScoreResult> = None;
        for method in ComparisonMethod::ALL {
            let Some(candidate) = results.get(&method) else {
                continue;
            };
            match best {
                Some(current)
                    if round_to(candidate.score, SCORE_DECIMALS)
                        <= round_to(current.score, SCORE_DECIMALS) => {}
                _ => best = Some(candidate),
            }
        }
        let best_method = best.map_or(ComparisonMethod::ALL[0], ScoreResult::method);
        Self {
            best_method,
            results,
        }
    }

    fn best(&self) -> Option<&ScoreResult> {
        self.results.get(&self.best_method)
    }

    /// The method with the highest score.
    pub fn best_method(&self) -> ComparisonMethod {
        self.best_method
    }

    /// Score of the best method.
    pub fn best_score(&self) -> f32 {
        self.best().map_or(0.0, ScoreResult::score)
    }

    /// Score of the best method in percent.
    pub fn best_score_percentage(&self) -> f32 {
        self.best().map_or(0.0, ScoreResult::score_percentage)
    }

    /// Per-method results, ordered by priority.
    pub fn results(&self) -> &BTreeMap<ComparisonMethod, ScoreResult> {
        &self.results
    }

    /// Result of a single method.
    pub fn result(&self, method: ComparisonMethod) -> Option<&ScoreResult> {
        self.results.get(&method)
    }

    /// Success flag of the best method.
    pub fn success(&self) -> bool {
        self.best().is_some_and(ScoreResult::success)
    }

    /// Error of the best method, if any.
    pub fn error(&self) -> Option<&str> {
        self.best().and_then(ScoreResult::error)
    }
}

/// Configuration for all scorers.
#[derive(Clone, Debug)]
pub struct ComparatorConfig {
    /// SSIM window and stabilizer parameters.
    pub ssim: SsimConfig,
    /// Keypoint detector and matching parameters.
    pub orb: OrbConfig,
    /// Run batch comparisons in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            ssim: SsimConfig::default(),
            orb: OrbConfig::default(),
            parallel: cfg!(feature = "rayon"),
        }
    }
}

/// Multi-method image comparator.
#[derive(Clone, Debug)]
pub struct Comparator {
    ssim: StructuralSimilarityScorer,
    orb: FeatureMatchScorer,
    template: TemplateCorrelationScorer,
    parallel: bool,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Creates a comparator with default parameters.
    pub fn new() -> Self {
        Self::with_config(ComparatorConfig::default())
    }

    /// Creates a comparator from explicit parameters.
    pub fn with_config(cfg: ComparatorConfig) -> Self {
        Self {
            ssim: StructuralSimilarityScorer::new(cfg.ssim),
            orb: FeatureMatchScorer::new(cfg.orb),
            template: TemplateCorrelationScorer,
            parallel: cfg.parallel,
        }
    }

    /// Returns the scorer implementing `method`.
    pub fn scorer(&self, method: ComparisonMethod) -> &dyn Scorer {
        match method {
            ComparisonMethod::StructuralSimilarity => &self.ssim,
            ComparisonMethod::FeatureMatch => &self.orb,
            ComparisonMethod::TemplateCorrelation => &self.template,
        }
    }

    /// Scores `test` against `reference` with a single method.
    pub fn compare(&self, reference: &Image, test: &Image, method: ComparisonMethod) -> ScoreResult {
        let _span = trace_span!("compare", method = method.name()).entered();
        match self.scorer(method).score(reference.view(), test.view()) {
            Ok(score) => {
                let result = ScoreResult::succeeded(method, score);
                trace_event!(
                    "comparison_finished",
                    score = result.score(),
                    percentage = result.score_percentage()
                );
                result
            }
            Err(err) => {
                let message = err.to_string();
                trace_warn!(
                    "comparison_failed",
                    method = method.name(),
                    error = message.as_str()
                );
                ScoreResult::failed(method, message)
            }
        }
    }

    /// Scores the pair with every method and selects the best one.
    pub fn compare_all(&self, reference: &Image, test: &Image) -> ComparisonReport {
        let _span = trace_span!("compare_all").entered();
        let results = ComparisonMethod::ALL
            .into_iter()
            .map(|method| (method, self.compare(reference, test, method)))
            .collect();
        let report = ComparisonReport::from_results(results);
        trace_event!(
            "best_method",
            method = report.best_method().name(),
            score = report.best_score()
        );
        report
    }

    /// Scores every test image against one reference.
    ///
    /// Output order matches `tests`. Pairs run on the rayon pool when the
    /// `rayon` feature is enabled and the comparator is configured parallel.
    pub fn compare_batch(
        &self,
        reference: &Image,
        tests: &[Image],
        method: ComparisonMethod,
    ) -> Vec<ScoreResult> {
        let _span = trace_span!("compare_batch", count = tests.len()).entered();
        #[cfg(feature = "rayon")]
        if self.parallel {
            return tests
                .par_iter()
                .map(|test| self.compare(reference, test, method))
                .collect();
        }
        #[cfg(not(feature = "rayon"))]
        let _ = self.parallel;
        tests
            .iter()
            .map(|test| self.compare(reference, test, method))
            .collect()
    }

    /// Loads both sources once and scores them with a single method.
    ///
    /// A load failure becomes a failed result.
    #[cfg(feature = "image-io")]
    pub fn compare_sources(
        &self,
        reference: &ImageSource,
        test: &ImageSource,
        method: ComparisonMethod,
    ) -> ScoreResult {
        match load_pair(reference, test) {
            Ok((reference, test)) => self.compare(&reference, &test, method),
            Err(message) => ScoreResult::failed(method, message),
        }
    }

    /// Loads both sources once and scores them with every method.
    ///
    /// A load failure marks every method as failed with the same message.
    #[cfg(feature = "image-io")]
    pub fn compare_all_sources(
        &self,
        reference: &ImageSource,
        test: &ImageSource,
    ) -> ComparisonReport {
        match load_pair(reference, test) {
            Ok((reference, test)) => self.compare_all(&reference, &test),
            Err(message) => ComparisonReport::from_results(
                ComparisonMethod::ALL
                    .into_iter()
                    .map(|method| (method, ScoreResult::failed(method, message.clone())))
                    .collect(),
            ),
        }
    }
}

#[cfg(feature = "image-io")]
fn load_pair(reference: &ImageSource, test: &ImageSource) -> Result<(Image, Image), String> {
    let loaded = load(reference).and_then(|reference| Ok((reference, load(test)?)));
    loaded.map_err(|err| {
        let message = err.to_string();
        trace_warn!("load_failed", error = message.as_str());
        message
    })
}

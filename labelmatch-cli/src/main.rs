use clap::Parser;
use labelmatch::compare::SCORE_DECIMALS;
use labelmatch::{
    Comparator, ComparatorConfig, ComparisonMethod, ComparisonReport, ImageSource,
    LabelMatchError, OrbConfig, ScoreResult, SsimConfig,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Score the similarity of a test image to a reference image")]
struct Cli {
    /// Reference image path or URL.
    #[arg(required_unless_present = "print_example")]
    reference: Option<String>,
    /// Test image path or URL.
    #[arg(required_unless_present = "print_example")]
    test: Option<String>,
    /// Comparison method: ssim, orb, template or all.
    #[arg(short, long, default_value = "ssim", value_parser = parse_method)]
    method: MethodSelection,
    /// Write the JSON result to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Optional JSON file with scorer parameters.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output on stderr.
    #[arg(long)]
    trace: bool,
}

/// One method, or every method with best-of selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MethodSelection {
    Single(ComparisonMethod),
    All,
}

fn parse_method(raw: &str) -> Result<MethodSelection, LabelMatchError> {
    match raw {
        "all" => Ok(MethodSelection::All),
        name => name.parse().map(MethodSelection::Single),
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SsimConfigJson {
    window_size: usize,
    sigma: f32,
    gaussian_weights: bool,
    k1: f32,
    k2: f32,
    data_range: f32,
}

impl Default for SsimConfigJson {
    fn default() -> Self {
        let cfg = SsimConfig::default();
        Self {
            window_size: cfg.window_size,
            sigma: cfg.sigma,
            gaussian_weights: cfg.gaussian_weights,
            k1: cfg.k1,
            k2: cfg.k2,
            data_range: cfg.data_range,
        }
    }
}

impl From<SsimConfigJson> for SsimConfig {
    fn from(value: SsimConfigJson) -> Self {
        Self {
            window_size: value.window_size,
            sigma: value.sigma,
            gaussian_weights: value.gaussian_weights,
            k1: value.k1,
            k2: value.k2,
            data_range: value.data_range,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OrbConfigJson {
    max_features: usize,
    levels: usize,
    scale_factor: f32,
    fast_threshold: u8,
    edge_threshold: usize,
    patch_size: usize,
    max_match_distance: u32,
}

impl Default for OrbConfigJson {
    fn default() -> Self {
        let cfg = OrbConfig::default();
        Self {
            max_features: cfg.max_features,
            levels: cfg.levels,
            scale_factor: cfg.scale_factor,
            fast_threshold: cfg.fast_threshold,
            edge_threshold: cfg.edge_threshold,
            patch_size: cfg.patch_size,
            max_match_distance: cfg.max_match_distance,
        }
    }
}

impl From<OrbConfigJson> for OrbConfig {
    fn from(value: OrbConfigJson) -> Self {
        Self {
            max_features: value.max_features,
            levels: value.levels,
            scale_factor: value.scale_factor,
            fast_threshold: value.fast_threshold,
            edge_threshold: value.edge_threshold,
            patch_size: value.patch_size,
            max_match_distance: value.max_match_distance,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    ssim: SsimConfigJson,
    orb: OrbConfigJson,
}

impl From<Config> for ComparatorConfig {
    fn from(value: Config) -> Self {
        Self {
            ssim: value.ssim.into(),
            orb: value.orb.into(),
            ..ComparatorConfig::default()
        }
    }
}

/// Rounds to a fixed number of decimals for presentation.
fn round(value: f32, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value as f64 * factor).round() / factor
}

#[derive(Debug, Serialize)]
struct ResultRecord {
    method: &'static str,
    score: f64,
    score_percentage: f64,
    reference_image: String,
    test_image: String,
    success: bool,
    error: Option<String>,
}

impl ResultRecord {
    fn new(result: &ScoreResult, reference: &str, test: &str) -> Self {
        Self {
            method: result.method().name(),
            score: round(result.score(), SCORE_DECIMALS),
            score_percentage: round(result.score() * 100.0, 2),
            reference_image: reference.to_string(),
            test_image: test.to_string(),
            success: result.success(),
            error: result.error().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
struct AllResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    ssim: Option<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orb: Option<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<ResultRecord>,
}

#[derive(Debug, Serialize)]
struct ReportRecord {
    best_method: &'static str,
    best_score: f64,
    best_score_percentage: f64,
    all_results: AllResults,
    success: bool,
    error: Option<String>,
}

impl ReportRecord {
    fn new(report: &ComparisonReport, reference: &str, test: &str) -> Self {
        let record = |method| {
            report
                .result(method)
                .map(|result| ResultRecord::new(result, reference, test))
        };
        Self {
            best_method: report.best_method().name(),
            best_score: round(report.best_score(), SCORE_DECIMALS),
            best_score_percentage: round(report.best_score() * 100.0, 2),
            all_results: AllResults {
                ssim: record(ComparisonMethod::StructuralSimilarity),
                orb: record(ComparisonMethod::FeatureMatch),
                template: record(ComparisonMethod::TemplateCorrelation),
            },
            success: report.success(),
            error: report.error().map(str::to_string),
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("labelmatch=info".parse()?),
            )
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(reference), Some(test)) = (cli.reference, cli.test) else {
        return Err("reference and test images are required".into());
    };

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let comparator = Comparator::with_config(config.into());
    let reference_source = ImageSource::parse(&reference);
    let test_source = ImageSource::parse(&test);
    tracing::info!(
        reference = %reference_source,
        test = %test_source,
        method = ?cli.method,
        "comparing images"
    );

    let (json, success) = match cli.method {
        MethodSelection::Single(method) => {
            let result = comparator.compare_sources(&reference_source, &test_source, method);
            let record = ResultRecord::new(&result, &reference, &test);
            (serde_json::to_string_pretty(&record)?, record.success)
        }
        MethodSelection::All => {
            let report = comparator.compare_all_sources(&reference_source, &test_source);
            let record = ReportRecord::new(&report, &reference, &test);
            (serde_json::to_string_pretty(&record)?, record.success)
        }
    };

    match cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

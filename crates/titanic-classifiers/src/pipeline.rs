//! Straight-line orchestration: load, engineer, split, scale, fit, report.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::data_handling::PassengerTable;
use crate::feature_engineering::{engineer_features, select_features};
use crate::io::read_passenger_csv;
use crate::models::{ClassifierModel, FittedClassifier, LogisticClassifier};
use crate::preprocessing::{train_test_split, Scaler, TrainTestSplit};
use crate::report::console::print_summary;
use crate::report::plots::{survival_plots, write_plots};
use crate::report::report::build_report;
use crate::report::samples::{predict_samples, SamplePredictions};
use crate::stats::ClassificationMetrics;

pub const REPORT_FILE: &str = "titanic_report.html";

/// Everything a run produces. The scaler and model are plain values owned
/// here and lent to the reporter.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub raw_preview: String,
    pub engineered_preview: String,
    /// The table after encoding, imputation and class flags.
    pub table: PassengerTable,
    pub age_fill_value: f64,
    pub feature_names: Vec<String>,
    pub split: TrainTestSplit,
    pub scaler: Scaler,
    pub model: FittedClassifier,
    pub train_score: f64,
    pub test_score: f64,
    pub test_metrics: ClassificationMetrics,
    pub samples: SamplePredictions,
    /// Files written by `run_pipeline`; empty after `fit_pipeline`.
    pub artifacts: Vec<PathBuf>,
}

/// Run every computational stage without printing or writing files.
pub fn fit_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome> {
    let start_time = Instant::now();

    let mut table = read_passenger_csv(&config.data_path)?;
    table.log_input_data_summary();
    let raw_preview = table.head(config.preview_rows);

    let age_fill_value = engineer_features(&mut table)
        .with_context(|| format!("Feature engineering failed for {}", config.data_path.display()))?;
    let engineered_preview = table.head(config.preview_rows);

    let features = select_features(&table)?;
    let split = train_test_split(features.n_samples(), config.test_size, config.seed)?;
    log::info!(
        "Split {} passengers into {} train / {} test (seed {})",
        features.n_samples(),
        split.train.len(),
        split.test.len(),
        config.seed
    );
    let train = features.select_rows(&split.train);
    let test = features.select_rows(&split.test);

    let scaler = Scaler::fit(&train.x)?;
    let train_x = scaler.transform(&train.x)?;
    let test_x = scaler.transform(&test.x)?;
    log::debug!("Scaler mean {:?}, scale {:?}", scaler.mean, scaler.scale);

    let model = LogisticClassifier::new(config.model.clone()).fit(&train_x, &train.y)?;
    let train_score = model.score(&train_x, &train.y);
    let test_score = model.score(&test_x, &test.y);
    let test_metrics = ClassificationMetrics::compute(&model.predict(&test_x), &test.y);
    log::info!(
        "{}: train accuracy {:.4}, test accuracy {:.4} (precision {:.4}, recall {:.4}, F1 {:.4})",
        model.name(),
        train_score,
        test_score,
        test_metrics.precision,
        test_metrics.recall,
        test_metrics.f1
    );

    let samples = predict_samples(&config.samples, &scaler, &model)?;
    log::info!("Pipeline finished in {:?}", start_time.elapsed());

    Ok(PipelineOutcome {
        raw_preview,
        engineered_preview,
        table,
        age_fill_value,
        feature_names: features.feature_names,
        split,
        scaler,
        model,
        train_score,
        test_score,
        test_metrics,
        samples,
        artifacts: Vec::new(),
    })
}

/// Fit, print the console summary, then write plots and the HTML report
/// as configured.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome> {
    let mut outcome = fit_pipeline(config)?;
    print_summary(&outcome);

    if !(config.write_plots || config.write_report) {
        return Ok(outcome);
    }

    let plots = survival_plots(&outcome.table)?;
    if config.write_plots {
        let written = write_plots(&plots, &config.output_dir)?;
        outcome.artifacts.extend(written);
    }

    if config.write_report {
        let report = build_report(&outcome, config, plots)?;
        let path = config.output_dir.join(REPORT_FILE);
        report.save_to_file(&path)?;
        log::info!("Saved report to {}", path.display());
        outcome.artifacts.push(path);
    }

    Ok(outcome)
}

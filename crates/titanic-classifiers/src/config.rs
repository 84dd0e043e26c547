use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Hyper-parameters for the L2-regularized logistic regression.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// L2 penalty weight. The objective is `log-loss + alpha/2 * ||w||^2` with
    /// an unpenalized intercept, so 1.0 matches scikit-learn's `C = 1`.
    pub alpha: f64,
    pub max_iterations: u64,
    pub gradient_tolerance: f64,
    pub fit_intercept: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
            fit_intercept: true,
        }
    }
}

/// A hypothetical passenger to run through the fitted scaler and model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SamplePassenger {
    pub name: String,
    /// 1 for female, 0 for male.
    pub sex: f64,
    pub age: f64,
    pub first_class: bool,
    pub second_class: bool,
}

impl SamplePassenger {
    pub fn new(name: &str, sex: f64, age: f64, first_class: bool, second_class: bool) -> Self {
        Self {
            name: name.to_string(),
            sex,
            age,
            first_class,
            second_class,
        }
    }

    /// Feature vector in model order: Sex, Age, FirstClass, SecondClass.
    pub fn features(&self) -> [f64; 4] {
        [
            self.sex,
            self.age,
            if self.first_class { 1.0 } else { 0.0 },
            if self.second_class { 1.0 } else { 0.0 },
        ]
    }
}

pub fn default_samples() -> Vec<SamplePassenger> {
    vec![
        SamplePassenger::new("Jack", 0.0, 20.0, false, false),
        SamplePassenger::new("Rose", 1.0, 17.0, true, false),
        SamplePassenger::new("You", 0.0, 22.0, true, false),
    ]
}

/// Everything one pipeline run needs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub model: ModelConfig,
    /// Directory for plot files and the HTML report.
    pub output_dir: PathBuf,
    pub write_plots: bool,
    pub write_report: bool,
    /// Rows shown in the console table previews.
    pub preview_rows: usize,
    pub samples: Vec<SamplePassenger>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("passengers.csv"),
            test_size: 0.2,
            seed: 42,
            model: ModelConfig::default(),
            output_dir: PathBuf::from("plots"),
            write_plots: true,
            write_report: true,
            preview_rows: 5,
            samples: default_samples(),
        }
    }
}

/// Load a pipeline configuration from a JSON file. Missing keys take their
/// default values.
pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PipelineConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_samples_match_named_passengers() {
        let samples = default_samples();
        let names: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Jack", "Rose", "You"]);
        assert_eq!(samples[0].features(), [0.0, 20.0, 0.0, 0.0]);
        assert_eq!(samples[1].features(), [1.0, 17.0, 1.0, 0.0]);
        assert_eq!(samples[2].features(), [0.0, 22.0, 1.0, 0.0]);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"seed": 7, "model": {"alpha": 0.5}}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.model.alpha, 0.5);
        assert_eq!(cfg.model.max_iterations, 100);
        assert_eq!(cfg.test_size, 0.2);
        assert_eq!(cfg.samples.len(), 3);
    }
}

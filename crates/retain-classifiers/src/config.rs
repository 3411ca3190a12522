use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Model families that can be loaded from disk.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Linear model with a logistic link, stored as JSON coefficients.
    Logistic,
    /// Gradient boosted trees saved by the `gbdt` crate.
    GBDT,
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Logistic
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic" | "logistic_regression" | "logistic-regression" => Ok(ModelType::Logistic),
            "gbdt" => Ok(ModelType::GBDT),
            _ => Err(format!(
                "Unknown model type: {}. Supported model types are `logistic` and `gbdt`",
                s
            )),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// One already-trained model to load for comparison.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub name: String,
    pub model_type: ModelType,
    pub path: String,
    /// Probability at or above which the model predicts churn.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ModelSpec {
    pub fn new(name: &str, model_type: ModelType, path: &str) -> Self {
        Self {
            name: name.to_string(),
            model_type,
            path: path.to_string(),
            threshold: default_threshold(),
        }
    }
}

/// Parameters for a model performance review.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// CSV file holding the held-out test set.
    pub test_data: String,
    pub label_column: String,
    pub models: Vec<ModelSpec>,
    /// Evaluate models on the rayon thread pool.
    pub parallel: bool,
    /// HTML report destination; `None` disables the report.
    pub report_file: Option<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_data: "data/processed/test_data.csv".to_string(),
            label_column: "Churn".to_string(),
            models: vec![
                ModelSpec::new(
                    "logistic_regression",
                    ModelType::Logistic,
                    "models/logistic_regression.json",
                ),
                ModelSpec::new("gbdt", ModelType::GBDT, "models/gbdt.model"),
            ],
            parallel: true,
            report_file: Some("retain_model_comparison.html".to_string()),
        }
    }
}

/// Load an evaluation configuration from a JSON file.
pub fn load_evaluation_config<P: AsRef<Path>>(path: P) -> Result<EvaluationConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: EvaluationConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

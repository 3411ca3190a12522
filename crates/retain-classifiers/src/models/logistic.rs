use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::{labels_from_proba, ClassifierHandle};

/// Coefficients of a fitted logistic regression.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticParams {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Logistic regression with fixed, already-fitted coefficients.
pub struct LogisticClassifier {
    params: LogisticParams,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(params: LogisticParams, threshold: f64) -> Self {
        LogisticClassifier { params, threshold }
    }

    /// Load coefficients from a JSON file of the form
    /// `{"intercept": -1.2, "coefficients": [0.4, ...]}`.
    pub fn load<P: AsRef<Path>>(path: P, threshold: f64) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read logistic model: {}", path.as_ref().display())
        })?;
        let params: LogisticParams = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse logistic model: {}", path.as_ref().display())
        })?;
        Ok(Self::new(params, threshold))
    }

    pub fn params(&self) -> &LogisticParams {
        &self.params
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ClassifierHandle for LogisticClassifier {
    fn predict_labels(&self, features: &Array2<f32>) -> Result<Vec<u8>> {
        Ok(labels_from_proba(&self.predict_proba(features)?, self.threshold))
    }

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Vec<f64>> {
        if features.ncols() != self.params.coefficients.len() {
            bail!(
                "Logistic model expects {} features, got {}",
                self.params.coefficients.len(),
                features.ncols()
            );
        }
        let weights = Array1::from_vec(self.params.coefficients.clone());
        let margins = features.mapv(|v| v as f64).dot(&weights);
        Ok(margins.iter().map(|m| sigmoid(m + self.params.intercept)).collect())
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}

use std::path::Path;

use anyhow::{anyhow, Result};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;

use crate::models::classifier_trait::{labels_from_proba, ClassifierHandle};

/// Gradient Boosting Decision Tree (GBDT) classifier loaded from a saved model.
///
/// The model must have been trained with the `LogLikelyhood` loss so that
/// `predict` yields probabilities.
pub struct GBDTClassifier {
    model: GBDT,
    threshold: f64,
}

impl GBDTClassifier {
    pub fn new(model: GBDT, threshold: f64) -> Self {
        GBDTClassifier { model, threshold }
    }

    pub fn load<P: AsRef<Path>>(path: P, threshold: f64) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("GBDT model path is not valid UTF-8: {}", path.display()))?;
        let model = GBDT::load_model(path_str)
            .map_err(|e| anyhow!("Failed to load GBDT model {}: {}", path.display(), e))?;
        Ok(Self::new(model, threshold))
    }
}

impl ClassifierHandle for GBDTClassifier {
    fn predict_labels(&self, features: &Array2<f32>) -> Result<Vec<u8>> {
        Ok(labels_from_proba(&self.predict_proba(features)?, self.threshold))
    }

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Vec<f64>> {
        let mut test_x = DataVec::new();
        for row in features.rows() {
            test_x.push(Data::new_test_data(row.to_vec(), None));
        }
        let predictions = self.model.predict(&test_x);
        Ok(predictions.into_iter().map(|p| p as f64).collect())
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

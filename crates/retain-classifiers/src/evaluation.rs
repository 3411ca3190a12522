//! Compare already-trained classifiers on a held-out test set.
//!
//! Every classifier is scored independently against the same features and
//! labels. A classifier that errors or returns malformed predictions is
//! excluded and reported as a [`ClassifierFailure`]; the others still get a
//! result. Results keep the insertion order of the [`ClassifierSet`], also
//! when the models are evaluated in parallel.
use ndarray::Array2;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{ClassifierFailure, RetainError};
use crate::metrics::{self, RocCurve};
use crate::models::classifier_trait::{ClassifierHandle, ClassifierSet};

/// Metrics and raw predictions of one classifier on the test set.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub roc_auc: f64,
    /// Aligned with the test set rows.
    pub predicted_labels: Vec<u8>,
    /// Aligned with the test set rows.
    pub predicted_probabilities: Vec<f64>,
}

/// Per-classifier outcome of an evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome {
    Evaluated(EvaluationResult),
    Failed(ClassifierFailure),
}

/// Evaluation results keyed by model name, in insertion order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct EvaluationResults {
    entries: Vec<(String, EvaluationResult)>,
}

impl EvaluationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, result: EvaluationResult) {
        self.entries.push((name.into(), result));
    }

    pub fn get(&self, name: &str) -> Option<&EvaluationResult> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvaluationResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }
}

/// Output of [`evaluate`]: surviving results plus the excluded classifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub results: EvaluationResults,
    pub failures: Vec<ClassifierFailure>,
}

impl Evaluation {
    pub fn best_model(&self) -> Result<&str, RetainError> {
        select_best(&self.results)
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationOptions {
    /// Evaluate classifiers concurrently on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Evaluate every classifier in `classifiers` on `features` / `labels`.
///
/// `labels` must be aligned with the rows of `features` and contain only `0`
/// and `1`.
///
/// # Errors
///
/// * `InvalidInput` if the test set is empty, misaligned, or has a label other
///   than `0`/`1`.
/// * `EmptyEvaluationSet` if no classifier was supplied or every one failed.
pub fn evaluate(
    classifiers: &ClassifierSet,
    features: &Array2<f32>,
    labels: &[u8],
) -> Result<Evaluation, RetainError> {
    evaluate_with(classifiers, features, labels, &EvaluationOptions::default())
}

pub fn evaluate_with(
    classifiers: &ClassifierSet,
    features: &Array2<f32>,
    labels: &[u8],
    options: &EvaluationOptions,
) -> Result<Evaluation, RetainError> {
    validate_test_set(features, labels)?;

    if classifiers.is_empty() {
        return Err(RetainError::EmptyEvaluationSet {
            supplied: 0,
            failures: Vec::new(),
        });
    }

    log::info!(
        "Evaluating {} classifiers on {} samples",
        classifiers.len(),
        labels.len()
    );

    let run = |(name, model): &(String, Box<dyn ClassifierHandle>)| {
        let outcome = match evaluate_one(name, model.as_ref(), features, labels) {
            Ok(result) => ModelOutcome::Evaluated(result),
            Err(RetainError::ClassifierFailure(failure)) => ModelOutcome::Failed(failure),
            Err(other) => ModelOutcome::Failed(ClassifierFailure {
                model: name.clone(),
                reason: other.to_string(),
            }),
        };
        (name.clone(), outcome)
    };

    // collect() on an indexed parallel iterator preserves input order
    let outcomes: Vec<(String, ModelOutcome)> = if options.parallel {
        classifiers.entries().par_iter().map(run).collect()
    } else {
        classifiers.entries().iter().map(run).collect()
    };

    let mut results = EvaluationResults::new();
    let mut failures = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            ModelOutcome::Evaluated(result) => {
                log::debug!("{}: ROC-AUC {:.3}", name, result.roc_auc);
                results.push(name, result);
            }
            ModelOutcome::Failed(failure) => {
                log::warn!("Error evaluating {}: {}", name, failure.reason);
                failures.push(failure);
            }
        }
    }

    if results.is_empty() {
        return Err(RetainError::EmptyEvaluationSet {
            supplied: classifiers.len(),
            failures,
        });
    }

    Ok(Evaluation { results, failures })
}

fn validate_test_set(features: &Array2<f32>, labels: &[u8]) -> Result<(), RetainError> {
    if labels.is_empty() {
        return Err(RetainError::InvalidInput(
            "test set must contain at least one sample".to_string(),
        ));
    }
    if features.nrows() != labels.len() {
        return Err(RetainError::InvalidInput(format!(
            "test set has {} feature rows but {} labels",
            features.nrows(),
            labels.len()
        )));
    }
    if let Some(pos) = labels.iter().position(|&l| l > 1) {
        return Err(RetainError::InvalidInput(format!(
            "label at row {} is {}, expected 0 or 1",
            pos + 1,
            labels[pos]
        )));
    }
    Ok(())
}

/// Score one classifier. Errors and malformed output come back as
/// [`RetainError::ClassifierFailure`] for `name`.
fn evaluate_one(
    name: &str,
    model: &dyn ClassifierHandle,
    features: &Array2<f32>,
    labels: &[u8],
) -> Result<EvaluationResult, RetainError> {
    let fail = |reason: String| RetainError::classifier_failure(name, reason);

    let predicted_labels = model
        .predict_labels(features)
        .map_err(|e| fail(format!("label prediction failed: {:#}", e)))?;
    let predicted_probabilities = model
        .predict_proba(features)
        .map_err(|e| fail(format!("probability prediction failed: {:#}", e)))?;

    if predicted_labels.len() != labels.len() {
        return Err(fail(format!(
            "returned {} labels for {} samples",
            predicted_labels.len(),
            labels.len()
        )));
    }
    if predicted_probabilities.len() != labels.len() {
        return Err(fail(format!(
            "returned {} probabilities for {} samples",
            predicted_probabilities.len(),
            labels.len()
        )));
    }
    if let Some(bad) = predicted_labels.iter().find(|&&l| l > 1) {
        return Err(fail(format!("predicted label {} is not 0 or 1", bad)));
    }
    if let Some(bad) = predicted_probabilities
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
    {
        return Err(fail(format!("probability {} is outside [0, 1]", bad)));
    }

    let roc_auc =
        metrics::roc_auc(labels, &predicted_probabilities).map_err(|e| fail(e.to_string()))?;

    Ok(EvaluationResult {
        accuracy: metrics::accuracy(labels, &predicted_labels),
        precision: metrics::precision(labels, &predicted_labels),
        recall: metrics::recall(labels, &predicted_labels),
        f1_score: metrics::f1_score(labels, &predicted_labels),
        roc_auc,
        predicted_labels,
        predicted_probabilities,
    })
}

/// Name of the model with the highest ROC-AUC.
///
/// Ties go to the model that comes first in iteration order.
pub fn select_best(results: &EvaluationResults) -> Result<&str, RetainError> {
    let mut best: Option<(&str, f64)> = None;
    for (name, result) in results.iter() {
        if best.map_or(true, |(_, auc)| result.roc_auc > auc) {
            best = Some((name, result.roc_auc));
        }
    }
    best.map(|(name, _)| name)
        .ok_or(RetainError::EmptyEvaluationSet {
            supplied: 0,
            failures: Vec::new(),
        })
}

/// ROC curve of every evaluated model, in result order.
pub fn roc_curves(results: &EvaluationResults, labels: &[u8]) -> Vec<(String, RocCurve)> {
    results
        .iter()
        .map(|(name, result)| {
            (
                name.to_string(),
                metrics::roc_curve(labels, &result.predicted_probabilities),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_auc(roc_auc: f64) -> EvaluationResult {
        EvaluationResult {
            accuracy: 0.5,
            precision: 0.5,
            recall: 0.5,
            f1_score: 0.5,
            roc_auc,
            predicted_labels: vec![],
            predicted_probabilities: vec![],
        }
    }

    #[test]
    fn select_best_prefers_first_on_ties() {
        let mut results = EvaluationResults::new();
        results.push("A", result_with_auc(0.80));
        results.push("B", result_with_auc(0.91));
        results.push("C", result_with_auc(0.91));
        assert_eq!(select_best(&results).unwrap(), "B");
    }

    #[test]
    fn select_best_on_empty_is_an_error() {
        let results = EvaluationResults::new();
        assert!(matches!(
            select_best(&results),
            Err(RetainError::EmptyEvaluationSet { supplied: 0, .. })
        ));
    }

    #[test]
    fn evaluate_one_reports_classifier_failure() {
        use crate::models::logistic::{LogisticClassifier, LogisticParams};

        let x = Array2::<f32>::zeros((2, 1));
        // two coefficients for a one-column matrix
        let model = LogisticClassifier::new(
            LogisticParams {
                intercept: 0.0,
                coefficients: vec![1.0, 1.0],
            },
            0.5,
        );
        match evaluate_one("wide", &model, &x, &[0, 1]) {
            Err(RetainError::ClassifierFailure(failure)) => {
                assert_eq!(failure.model, "wide");
                assert!(failure.reason.starts_with("label prediction failed"));
            }
            other => panic!("expected ClassifierFailure, got {:?}", other),
        }

        let single_class = LogisticClassifier::new(
            LogisticParams {
                intercept: 0.0,
                coefficients: vec![1.0],
            },
            0.5,
        );
        match evaluate_one("single", &single_class, &x, &[1, 1]) {
            Err(RetainError::ClassifierFailure(failure)) => {
                assert!(failure.reason.contains("only one class"));
            }
            other => panic!("expected ClassifierFailure, got {:?}", other),
        }
    }

    #[test]
    fn validate_test_set_rejects_bad_input() {
        let x = Array2::<f32>::zeros((2, 1));
        assert!(validate_test_set(&x, &[0, 1]).is_ok());
        assert!(validate_test_set(&x, &[0]).is_err());
        assert!(validate_test_set(&x, &[0, 2]).is_err());
        let empty = Array2::<f32>::zeros((0, 1));
        assert!(validate_test_set(&empty, &[]).is_err());
    }
}

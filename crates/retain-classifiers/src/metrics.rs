//! Binary classification metrics.
//!
//! Labels use the crate convention of `1` for churned and `0` for retained.
//! Probabilities are for the positive (churned) class.
use serde::Serialize;

use crate::error::RetainError;

/// Counts of a binary confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    pub fn from_labels(y_true: &[u8], y_pred: &[u8]) -> Self {
        assert_eq!(
            y_true.len(),
            y_pred.len(),
            "True and predicted labels must have equal lengths"
        );
        let mut counts = ConfusionCounts::default();
        for (&actual, &predicted) in y_true.iter().zip(y_pred.iter()) {
            match (actual == 1, predicted == 1) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Fraction of exact label matches.
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let counts = ConfusionCounts::from_labels(y_true, y_pred);
    ratio(counts.true_positives + counts.true_negatives, counts.total())
}

/// TP / (TP + FP), or 0 when nothing was predicted positive.
pub fn precision(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let counts = ConfusionCounts::from_labels(y_true, y_pred);
    ratio(
        counts.true_positives,
        counts.true_positives + counts.false_positives,
    )
}

/// TP / (TP + FN), or 0 when there are no positives.
pub fn recall(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let counts = ConfusionCounts::from_labels(y_true, y_pred);
    ratio(
        counts.true_positives,
        counts.true_positives + counts.false_negatives,
    )
}

/// Harmonic mean of precision and recall, 0 when both are 0.
pub fn f1_score(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let p = precision(y_true, y_pred);
    let r = recall(y_true, y_pred);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Probabilities at or above this value count as positive.
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

/// ROC curve ordered by descending threshold, from (0, 0) to (1, 1).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    /// Area under the curve (trapezoidal rule).
    pub fn auc(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
            .sum()
    }
}

/// Compute the ROC curve of `probabilities` against `y_true`.
///
/// Every distinct probability is used as a threshold, from highest to lowest,
/// and a point is emitted with the rates of predictions at or above it. The
/// curve always starts at (0, 0) and ends at (1, 1). If one class is missing
/// from `y_true`, its rate is reported as 0 at every threshold.
///
/// # Panics
///
/// If the two slices have different lengths or a probability is NaN.
pub fn roc_curve(y_true: &[u8], probabilities: &[f64]) -> RocCurve {
    assert_eq!(
        y_true.len(),
        probabilities.len(),
        "Labels and probabilities must have equal lengths"
    );

    let total_pos = y_true.iter().filter(|&&l| l == 1).count();
    let total_neg = y_true.len() - total_pos;

    let mut sorted_indices = (0..probabilities.len()).collect::<Vec<usize>>();
    sorted_indices.sort_unstable_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .expect("probabilities must not be NaN")
    });

    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    }];

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut i = 0;
    while i < sorted_indices.len() {
        let threshold = probabilities[sorted_indices[i]];
        while i < sorted_indices.len() && probabilities[sorted_indices[i]] == threshold {
            if y_true[sorted_indices[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold,
            fpr: ratio(fp, total_neg),
            tpr: ratio(tp, total_pos),
        });
    }

    let ends_at_corner = points
        .last()
        .map(|p| p.fpr == 1.0 && p.tpr == 1.0)
        .unwrap_or(false);
    if !ends_at_corner {
        points.push(RocPoint {
            threshold: f64::NEG_INFINITY,
            fpr: 1.0,
            tpr: 1.0,
        });
    }

    RocCurve { points }
}

/// Area under the ROC curve.
///
/// Tied probabilities contribute half credit, so this equals the probability
/// that a random churned customer is ranked above a random retained one.
pub fn roc_auc(y_true: &[u8], probabilities: &[f64]) -> Result<f64, RetainError> {
    if y_true.len() != probabilities.len() {
        return Err(RetainError::InvalidInput(format!(
            "{} labels but {} probabilities",
            y_true.len(),
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|p| p.is_nan()) {
        return Err(RetainError::InvalidInput(
            "probabilities contain NaN".to_string(),
        ));
    }
    let positives = y_true.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == y_true.len() {
        return Err(RetainError::InvalidInput(
            "ROC-AUC is undefined when only one class is present in the true labels".to_string(),
        ));
    }
    Ok(roc_curve(y_true, probabilities).auc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_counts() {
        let counts = ConfusionCounts::from_labels(&[1, 1, 0, 0, 1], &[1, 0, 1, 0, 1]);
        assert_eq!(counts.true_positives, 2);
        assert_eq!(counts.false_negatives, 1);
        assert_eq!(counts.false_positives, 1);
        assert_eq!(counts.true_negatives, 1);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn basic_metrics() {
        let y_true = [1, 1, 0, 0, 1];
        let y_pred = [1, 0, 1, 0, 1];
        assert!((accuracy(&y_true, &y_pred) - 0.6).abs() < 1e-12);
        assert!((precision(&y_true, &y_pred) - 2.0 / 3.0).abs() < 1e-12);
        assert!((recall(&y_true, &y_pred) - 2.0 / 3.0).abs() < 1e-12);
        assert!((f1_score(&y_true, &y_pred) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_denominators_yield_zero() {
        // nothing predicted positive and nothing actually positive
        let y_true = [0, 0, 0];
        let y_pred = [0, 0, 0];
        assert_eq!(precision(&y_true, &y_pred), 0.0);
        assert_eq!(recall(&y_true, &y_pred), 0.0);
        assert_eq!(f1_score(&y_true, &y_pred), 0.0);
        assert_eq!(accuracy(&y_true, &y_pred), 1.0);
    }

    #[test]
    fn roc_curve_with_ties() {
        let curve = roc_curve(&[1, 0, 1, 0], &[0.9, 0.5, 0.5, 0.1]);
        let fpr = curve.fpr();
        let tpr = curve.tpr();
        assert_eq!(fpr, vec![0.0, 0.0, 0.5, 1.0]);
        assert_eq!(tpr, vec![0.0, 0.5, 1.0, 1.0]);
        assert!((curve.auc() - 0.875).abs() < 1e-12);
    }

    #[test]
    fn roc_curve_single_class_still_reaches_corner() {
        // all negatives: tpr has no denominator and stays at 0 until the end
        let curve = roc_curve(&[0, 0], &[0.8, 0.2]);
        assert_eq!(curve.tpr(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(curve.fpr(), vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn roc_auc_rejects_single_class() {
        assert!(matches!(
            roc_auc(&[1, 1, 1], &[0.2, 0.4, 0.9]),
            Err(RetainError::InvalidInput(_))
        ));
    }
}

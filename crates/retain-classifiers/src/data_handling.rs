use ndarray::Array2;
use serde::Serialize;

/// Held-out labeled test set: one feature row per customer and an aligned
/// churn label (`1` churned, `0` retained).
#[derive(Debug, Clone)]
pub struct TestSet {
    pub feature_names: Vec<String>,
    pub features: Array2<f32>,
    pub labels: Vec<u8>,
}

impl TestSet {
    pub fn new(feature_names: Vec<String>, features: Array2<f32>, labels: Vec<u8>) -> Self {
        assert_eq!(
            features.nrows(),
            labels.len(),
            "Features and labels must have the same number of rows"
        );
        TestSet {
            feature_names,
            features,
            labels,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Fraction of churned customers.
    pub fn churn_rate(&self) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l == 1).count() as f64 / self.labels.len() as f64
    }
}

/// One row of the cleaned customer table, reduced to the columns the
/// segment summary reads.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub contract: String,
    pub payment_method: String,
    pub tenure_months: u32,
    pub monthly_charges: f64,
    pub churned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churn_rate_of_test_set() {
        let x = Array2::<f32>::zeros((4, 2));
        let set = TestSet::new(vec!["a".into(), "b".into()], x, vec![1, 0, 0, 1]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.n_features(), 2);
        assert!((set.churn_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "same number of rows")]
    fn misaligned_labels_panic() {
        let x = Array2::<f32>::zeros((3, 1));
        let _ = TestSet::new(vec!["a".into()], x, vec![1]);
    }
}

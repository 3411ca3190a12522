use std::fmt;

use anyhow::Result;
use ndarray::Array2;

/// An already-trained binary classifier.
///
/// Rows of `features` are samples. Implementations return one entry per row:
/// `1` (churned) or `0` (retained) for labels, and the churn probability in
/// `[0, 1]` for probabilities. The evaluation engine only reads predictions
/// and never inspects model internals, so stubs and test doubles work as well
/// as real models.
pub trait ClassifierHandle: Send + Sync {
    fn predict_labels(&self, features: &Array2<f32>) -> Result<Vec<u8>>;

    fn predict_proba(&self, features: &Array2<f32>) -> Result<Vec<f64>>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

/// Named classifiers in insertion order.
#[derive(Default)]
pub struct ClassifierSet {
    entries: Vec<(String, Box<dyn ClassifierHandle>)>,
}

impl ClassifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classifier. An existing entry with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, model: Box<dyn ClassifierHandle>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((name, model)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn ClassifierHandle> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, model)| model.as_ref())
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

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ClassifierHandle)> {
        self.entries
            .iter()
            .map(|(name, model)| (name.as_str(), model.as_ref()))
    }

    pub(crate) fn entries(&self) -> &[(String, Box<dyn ClassifierHandle>)] {
        &self.entries
    }
}

impl fmt::Debug for ClassifierSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClassifierSet")
            .field("models", &self.names())
            .finish()
    }
}

/// Threshold churn probabilities into labels.
pub fn labels_from_proba(probabilities: &[f64], threshold: f64) -> Vec<u8> {
    probabilities
        .iter()
        .map(|&p| if p >= threshold { 1 } else { 0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f64);

    impl ClassifierHandle for Constant {
        fn predict_labels(&self, features: &Array2<f32>) -> Result<Vec<u8>> {
            Ok(labels_from_proba(&self.predict_proba(features)?, 0.5))
        }

        fn predict_proba(&self, features: &Array2<f32>) -> Result<Vec<f64>> {
            Ok(vec![self.0; features.nrows()])
        }
    }

    #[test]
    fn insert_keeps_order_and_replaces_in_place() {
        let mut set = ClassifierSet::new();
        set.insert("a", Box::new(Constant(0.1)));
        set.insert("b", Box::new(Constant(0.2)));
        set.insert("a", Box::new(Constant(0.9)));
        assert_eq!(set.names(), vec!["a", "b"]);

        let x = Array2::<f32>::zeros((2, 1));
        let probs = set.get("a").unwrap().predict_proba(&x).unwrap();
        assert_eq!(probs, vec![0.9, 0.9]);
        assert!(set.get("c").is_none());
    }

    #[test]
    fn debug_lists_model_names() {
        let mut set = ClassifierSet::new();
        set.insert("logistic_regression", Box::new(Constant(0.1)));
        set.insert("gbdt", Box::new(Constant(0.2)));
        assert_eq!(
            format!("{:?}", set),
            r#"ClassifierSet { models: ["logistic_regression", "gbdt"] }"#
        );
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(labels_from_proba(&[0.49, 0.5, 0.51], 0.5), vec![0, 1, 1]);
    }
}

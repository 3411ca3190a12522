use std::error::Error;
use std::fmt;

/// A classifier that was excluded from an evaluation run, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierFailure {
    pub model: String,
    pub reason: String,
}

impl fmt::Display for ClassifierFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

/// Error type for scoring and model evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum RetainError {
    /// Profile or test-set values outside their documented domains.
    InvalidInput(String),
    /// A single classifier failed during prediction or produced malformed output.
    ClassifierFailure(ClassifierFailure),
    /// No classifier was supplied, or none survived evaluation.
    EmptyEvaluationSet {
        supplied: usize,
        failures: Vec<ClassifierFailure>,
    },
}

impl RetainError {
    pub fn classifier_failure(model: impl Into<String>, reason: impl Into<String>) -> Self {
        RetainError::ClassifierFailure(ClassifierFailure {
            model: model.into(),
            reason: reason.into(),
        })
    }
}

impl fmt::Display for RetainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            RetainError::ClassifierFailure(failure) => {
                write!(f, "Classifier failure ({})", failure)
            }
            RetainError::EmptyEvaluationSet { supplied: 0, .. } => {
                write!(f, "No evaluable models: no classifiers were supplied")
            }
            RetainError::EmptyEvaluationSet { supplied, failures } => {
                write!(
                    f,
                    "No evaluable models: all {} classifiers failed ({})",
                    supplied,
                    failures
                        .iter()
                        .map(|failure| failure.to_string())
                        .collect::<Vec<_>>()
                        .join("; ")
                )
            }
        }
    }
}

impl Error for RetainError {}

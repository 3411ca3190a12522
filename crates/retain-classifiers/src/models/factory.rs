use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{ModelSpec, ModelType};
use crate::models::classifier_trait::{ClassifierHandle, ClassifierSet};
use crate::models::gbdt::GBDTClassifier;
use crate::models::logistic::LogisticClassifier;

/// Build a boxed classifier from a `ModelSpec` by loading it from disk.
pub fn build_model(spec: &ModelSpec) -> Result<Box<dyn ClassifierHandle>> {
    let model: Box<dyn ClassifierHandle> = match spec.model_type {
        ModelType::Logistic => Box::new(LogisticClassifier::load(&spec.path, spec.threshold)?),
        ModelType::GBDT => Box::new(GBDTClassifier::load(&spec.path, spec.threshold)?),
    };
    Ok(model)
}

/// Load every model in `specs`, in order.
///
/// Models whose file does not exist are skipped with a warning. Any other
/// load failure is returned as an error.
pub fn load_models(specs: &[ModelSpec]) -> Result<ClassifierSet> {
    let mut set = ClassifierSet::new();
    for spec in specs {
        if !Path::new(&spec.path).exists() {
            log::warn!(
                "Model file for '{}' not found at {}; skipping",
                spec.name,
                spec.path
            );
            continue;
        }
        let model = build_model(spec)
            .with_context(|| format!("Failed to load model '{}'", spec.name))?;
        log::debug!("Loaded {:?} model '{}' from {}", spec.model_type, spec.name, spec.path);
        set.insert(spec.name.clone(), model);
    }
    log::info!("Loaded {} of {} configured models", set.len(), specs.len());
    Ok(set)
}

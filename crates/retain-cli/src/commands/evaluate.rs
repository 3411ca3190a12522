//! CLI helpers for comparing trained churn models.
use std::path::Path;

use anyhow::{bail, Context, Result};

use retain_classifiers::config::EvaluationConfig;
use retain_classifiers::data_handling::TestSet;
use retain_classifiers::evaluation::{evaluate_with, Evaluation, EvaluationOptions};
use retain_classifiers::io::{read_test_set_with_config, TestSetReaderConfig};
use retain_classifiers::models::factory::load_models;
use retain_classifiers::report::{build_evaluation_report, display_name};
use retain_classifiers::RetainError;

/// Outputs of one model comparison run.
#[derive(Debug)]
pub struct EvaluateRun {
    pub test_set: TestSet,
    pub evaluation: Evaluation,
}

/// Load the test set and models named in `config` and evaluate them.
pub fn run_evaluation(config: &EvaluationConfig) -> Result<EvaluateRun> {
    if !Path::new(&config.test_data).exists() {
        bail!(
            "Test data not found at {}. Run the data processing pipeline first.",
            config.test_data
        );
    }
    let reader_config = TestSetReaderConfig::with_label_column(&config.label_column);
    let test_set = read_test_set_with_config(&config.test_data, &reader_config)?;
    log::info!(
        "Loaded {} test samples ({} features, churn rate {:.1}%)",
        test_set.len(),
        test_set.n_features(),
        test_set.churn_rate() * 100.0
    );

    let models = load_models(&config.models)?;
    if models.is_empty() {
        bail!("No trained models found. Train models first and list them in the config.");
    }

    let options = EvaluationOptions {
        parallel: config.parallel,
    };
    let evaluation = match evaluate_with(&models, &test_set.features, &test_set.labels, &options) {
        Ok(evaluation) => evaluation,
        Err(e @ RetainError::EmptyEvaluationSet { .. }) => {
            return Err(e).context("Could not evaluate models. Please check model files.")
        }
        Err(e) => return Err(e.into()),
    };

    Ok(EvaluateRun {
        test_set,
        evaluation,
    })
}

/// Metrics table with three decimals, followed by the best model.
pub fn format_metrics_table(evaluation: &Evaluation) -> Result<String> {
    let mut out = format!(
        "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
        "Model", "Accuracy", "Precision", "Recall", "F1-Score", "ROC-AUC"
    );
    for (name, result) in evaluation.results.iter() {
        out.push_str(&format!(
            "{:<24} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}\n",
            display_name(name),
            result.accuracy,
            result.precision,
            result.recall,
            result.f1_score,
            result.roc_auc
        ));
    }

    let best = evaluation.best_model()?;
    let best_auc = evaluation
        .results
        .get(best)
        .map(|r| r.roc_auc)
        .context("Best model is missing from the results")?;
    out.push_str(&format!(
        "\nBest Performing Model: {} (ROC-AUC: {:.3})\n",
        display_name(best),
        best_auc
    ));

    if !evaluation.failures.is_empty() {
        out.push_str(&format!(
            "\n{} model(s) could not be evaluated:\n",
            evaluation.failures.len()
        ));
        for failure in &evaluation.failures {
            out.push_str(&format!("  {}\n", failure));
        }
    }
    Ok(out)
}

/// Render the HTML performance review to `path`.
pub fn write_evaluation_report<P: AsRef<Path>>(run: &EvaluateRun, path: P) -> Result<()> {
    let report = build_evaluation_report(&run.evaluation, &run.test_set.labels)
        .context("Failed to build evaluation report")?;
    report.save_to_file(&path)?;
    log::info!("Report written to {}", path.as_ref().display());
    Ok(())
}

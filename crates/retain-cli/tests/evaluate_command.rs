use retain_classifiers::config::{EvaluationConfig, ModelSpec, ModelType};
use retain_cli::commands::evaluate::{format_metrics_table, run_evaluation, write_evaluation_report};

fn config_in(dir: &tempfile::TempDir) -> EvaluationConfig {
    let data = dir.path().join("test_data.csv");
    std::fs::write(&data, "x,Churn\n2.0,1\n-2.0,0\n0.5,0\n-0.5,1\n").unwrap();
    let model = dir.path().join("logistic_regression.json");
    std::fs::write(&model, r#"{"intercept": 0.0, "coefficients": [1.0]}"#).unwrap();

    EvaluationConfig {
        test_data: data.to_str().unwrap().to_string(),
        models: vec![ModelSpec::new(
            "logistic_regression",
            ModelType::Logistic,
            model.to_str().unwrap(),
        )],
        parallel: false,
        report_file: None,
        ..EvaluationConfig::default()
    }
}

#[test]
fn run_evaluation_scores_configured_models() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir);

    let run = run_evaluation(&config).unwrap();
    assert_eq!(run.test_set.len(), 4);
    let result = run.evaluation.results.get("logistic_regression").unwrap();
    assert!((result.accuracy - 0.5).abs() < 1e-12);
    assert!((result.roc_auc - 0.75).abs() < 1e-12);

    let table = format_metrics_table(&run.evaluation).unwrap();
    assert!(table.contains("Best Performing Model: Logistic Regression (ROC-AUC: 0.750)"));

    let report = dir.path().join("report.html");
    write_evaluation_report(&run, &report).unwrap();
    assert!(std::fs::read_to_string(&report).unwrap().contains("Performance Metrics"));
}

#[test]
fn single_class_test_set_cannot_be_evaluated() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir);
    let data = dir.path().join("all_churned.csv");
    std::fs::write(&data, "x,Churn\n2.0,1\n-2.0,1\n").unwrap();
    config.test_data = data.to_str().unwrap().to_string();

    let err = run_evaluation(&config).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Could not evaluate models"));
    assert!(message.contains("only one class"));
}

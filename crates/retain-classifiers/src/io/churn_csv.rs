//! CSV reader for the processed churn test set.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;
use ndarray::Array2;

use crate::data_handling::TestSet;

/// Configuration for reading a churn test set.
#[derive(Debug, Clone)]
pub struct TestSetReaderConfig {
    /// Column holding the churn label.
    pub label_column: String,
    /// Field delimiter, `,` by default.
    pub delimiter: u8,
    /// Optional list of feature columns to load (in order).
    /// When `None`, every other column is treated as a feature.
    pub feature_columns: Option<Vec<String>>,
    /// Columns to ignore when auto-selecting features.
    pub ignore_columns: Vec<String>,
}

impl Default for TestSetReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "Churn".to_string(),
            delimiter: b',',
            feature_columns: None,
            ignore_columns: vec!["customerID".to_string(), "CustomerId".to_string()],
        }
    }
}

impl TestSetReaderConfig {
    pub fn with_label_column(label_column: &str) -> Self {
        Self {
            label_column: label_column.to_string(),
            ..Self::default()
        }
    }
}

/// Read a churn test set with the default configuration.
pub fn read_test_set<P: AsRef<Path>>(path: P) -> Result<TestSet> {
    read_test_set_with_config(path, &TestSetReaderConfig::default())
}

/// Read a churn test set using a custom configuration.
pub fn read_test_set_with_config<P: AsRef<Path>>(
    path: P,
    config: &TestSetReaderConfig,
) -> Result<TestSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open test data: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read test data header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", config.label_column))?;

    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        bail!("No feature columns detected in test data header");
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let raw_label = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?;
        let label = parse_label(raw_label)
            .with_context(|| format!("Invalid label at row {}", row_idx + 1))?;
        labels.push(label);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f32>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    if labels.is_empty() {
        bail!("Test data {} contains no rows", path.as_ref().display());
    }

    let n_samples = labels.len();
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    log::debug!(
        "Read {} samples with {} features from {}",
        n_samples,
        n_features,
        path.as_ref().display()
    );

    Ok(TestSet::new(feature_names, x, labels))
}

/// Accept `1`/`0`, `yes`/`no` and `true`/`false`.
pub(crate) fn parse_label(value: &str) -> Result<u8> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "yes" | "true" => Ok(1),
        "0" | "0.0" | "no" | "false" => Ok(0),
        other => bail!("expected a binary churn label, got '{}'", other),
    }
}

pub(crate) fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &TestSetReaderConfig,
    label_idx: usize,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.feature_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name)
                .ok_or_else(|| anyhow!("Missing feature column '{}'", name))?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    Ok(headers
        .iter()
        .enumerate()
        .filter(|&(idx, header)| {
            idx != label_idx && !ignore.contains(&header.trim().to_ascii_lowercase())
        })
        .map(|(idx, _)| idx)
        .collect())
}

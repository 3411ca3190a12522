use std::path::PathBuf;

use anyhow::{Context, Result};

use retain_classifiers::config::EvaluationConfig;

pub fn validate_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") => {}
        _ => anyhow::bail!("File must have a .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Pretty JSON template of the default evaluation configuration.
pub fn default_config_json() -> Result<String> {
    serde_json::to_string_pretty(&EvaluationConfig::default())
        .context("Failed to serialize default config")
}

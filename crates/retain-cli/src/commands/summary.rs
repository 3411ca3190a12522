//! CLI helpers for the customer base summary.
use std::path::Path;

use anyhow::{bail, Context, Result};

use retain_classifiers::io::read_customer_records;
use retain_classifiers::report::build_summary_report;
use retain_classifiers::summary::{analyze, SegmentAnalysis, SegmentStats};

/// Default location of the cleaned customer table.
pub const DEFAULT_DATA_PATH: &str = "data/processed/cleaned_data.csv";

/// Read the cleaned customer table at `path` and summarize it.
pub fn run_summary<P: AsRef<Path>>(path: P) -> Result<SegmentAnalysis> {
    let path = path.as_ref();
    if !path.exists() {
        bail!(
            "Data not found at {}. Please ensure the data processing pipeline has been completed.",
            path.display()
        );
    }
    let records = read_customer_records(path)?;
    let analysis = analyze(&records).context("Could not summarize customer data")?;
    log::info!(
        "Summarized {} customers across {} contract types",
        analysis.overview.total_customers,
        analysis.by_contract.len()
    );
    Ok(analysis)
}

fn push_segments(out: &mut String, heading: &str, segments: &[SegmentStats]) {
    out.push_str(&format!(
        "\n{:<28} {:>9} {:>9} {:>10}  {}\n",
        heading, "Customers", "Churned", "Churn Rate", "Risk"
    ));
    for stats in segments {
        out.push_str(&format!(
            "{:<28} {:>9} {:>9} {:>9.1}%  {:?}\n",
            stats.segment,
            stats.customers,
            stats.churned,
            stats.churn_rate * 100.0,
            stats.risk
        ));
    }
}

/// Plain-text rendering used on stdout.
pub fn format_summary(analysis: &SegmentAnalysis) -> String {
    let overview = &analysis.overview;
    let mut out = String::new();
    out.push_str(&format!("Total customers:     {}\n", overview.total_customers));
    out.push_str(&format!("Churned customers:   {}\n", overview.churned_customers));
    out.push_str(&format!(
        "Churn rate:          {:.1}% ({:?})\n",
        overview.churn_rate * 100.0,
        overview.alert
    ));
    out.push_str(&format!(
        "Avg monthly charges: ${:.2}\n",
        overview.avg_monthly_charges
    ));
    push_segments(&mut out, "Contract", &analysis.by_contract);
    push_segments(&mut out, "Payment Method", &analysis.by_payment_method);
    out
}

/// Render the HTML customer summary to `path`.
pub fn write_summary_report<P: AsRef<Path>>(analysis: &SegmentAnalysis, path: P) -> Result<()> {
    build_summary_report(analysis).save_to_file(&path)?;
    log::info!("Summary report written to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_data(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("cleaned_data.csv");
        std::fs::write(
            &path,
            "Contract,PaymentMethod,tenure,MonthlyCharges,Churn\n\
             Month-to-month,Electronic check,1,70.0,Yes\n\
             Month-to-month,Mailed check,5,50.0,No\n\
             Two year,Credit card (automatic),60,30.0,No\n\
             Two year,Bank transfer (automatic),70,50.0,No\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn summary_table_lists_segments() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = run_summary(write_data(&dir)).unwrap();
        let text = format_summary(&analysis);
        assert!(text.contains("Total customers:     4"));
        assert!(text.contains("Churn rate:          25.0% (Elevated)"));
        assert!(text.contains("Avg monthly charges: $50.00"));
        assert!(text.contains("Month-to-month"));
        assert!(text.contains("50.0%  High"));
        assert!(text.contains("0.0%  Low"));

        let report = dir.path().join("summary.html");
        write_summary_report(&analysis, &report).unwrap();
        assert!(std::fs::read_to_string(&report)
            .unwrap()
            .contains("Churn by Contract Type"));
    }

    #[test]
    fn missing_data_points_at_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_summary(dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("Data not found"));
        assert!(err.to_string().contains("data processing pipeline"));
    }
}

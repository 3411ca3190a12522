use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::evaluation::Evaluation;
use crate::report::plots::{
    plot_performance_comparison, plot_roc_curves, plot_segment_churn, plot_tenure_distribution,
};
use crate::summary::{AlertLevel, SegmentAnalysis, SegmentRisk, SegmentStats};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// `logistic_regression` -> `Logistic Regression`.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A titled block of HTML content and plots.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
    plots: Vec<Plot>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
            plots: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        self.plots.push(plot);
    }
}

/// Standalone HTML page assembled from sections.
pub struct Report {
    title: String,
    generated_at: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Report {
            title: title.to_string(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2rem; color: #1f2937; }
                        table { border-collapse: collapse; margin: 1rem 0; }
                        th, td { border: 1px solid #e5e7eb; padding: 0.4rem 0.8rem; text-align: right; }
                        th:first-child, td:first-child { text-align: left; }
                        .best { background-color: #ecfdf5; border-left: 4px solid #059669; padding: 0.8rem; }
                        .warning { background-color: #fffbeb; border-left: 4px solid #d97706; padding: 0.8rem; }
                        .critical { background-color: #fef2f2; border-left: 4px solid #dc2626; padding: 0.8rem; }
                        .risk-high { color: #dc2626; }
                        .risk-moderate { color: #d97706; }
                        .risk-low { color: #059669; }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p { "Generated " (self.generated_at) }
                    @for (section_idx, report_section) in self.sections.iter().enumerate() {
                        section {
                            h2 { (report_section.title) }
                            @for content in &report_section.content {
                                (content)
                            }
                            @for (plot_idx, plot) in report_section.plots.iter().enumerate() {
                                @let div_id = format!("plot-{}-{}", section_idx, plot_idx);
                                (PreEscaped(plot.to_inline_html(Some(&div_id))))
                            }
                        }
                    }
                }
            }
        };
        page.into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))
    }
}

/// Build the model performance review page for `evaluation`.
///
/// `labels` are the test set labels the evaluation was run against.
pub fn build_evaluation_report(evaluation: &Evaluation, labels: &[u8]) -> Result<Report> {
    let results = &evaluation.results;
    let best = evaluation.best_model()?;
    let best_result = results
        .get(best)
        .context("Best model is missing from the results")?;

    let mut report = Report::new("Churn Model Performance Review");

    /* Section 1: Metrics */
    {
        let mut metrics_section = ReportSection::new("Performance Metrics");
        metrics_section.add_content(html! {
            table {
                thead {
                    tr {
                        th { "Model" }
                        th { "Accuracy" }
                        th { "Precision" }
                        th { "Recall" }
                        th { "F1-Score" }
                        th { "ROC-AUC" }
                    }
                }
                tbody {
                    @for (name, result) in results.iter() {
                        tr {
                            td { (display_name(name)) }
                            td { (format!("{:.3}", result.accuracy)) }
                            td { (format!("{:.3}", result.precision)) }
                            td { (format!("{:.3}", result.recall)) }
                            td { (format!("{:.3}", result.f1_score)) }
                            td { (format!("{:.3}", result.roc_auc)) }
                        }
                    }
                }
            }
            div class="best" {
                "Best Performing Model: "
                strong { (display_name(best)) }
                (format!(" (ROC-AUC: {:.3})", best_result.roc_auc))
            }
        });
        if !evaluation.failures.is_empty() {
            metrics_section.add_content(html! {
                div class="warning" {
                    p { "The following models could not be evaluated:" }
                    ul {
                        @for failure in &evaluation.failures {
                            li { strong { (display_name(&failure.model)) } ": " (failure.reason) }
                        }
                    }
                }
            });
        }
        report.add_section(metrics_section);
    }

    /* Section 2: Comparison plots */
    {
        let mut plot_section = ReportSection::new("Model Comparison");
        plot_section.add_plot(plot_performance_comparison(
            results,
            "Model Performance Comparison",
        ));
        let roc_plot = plot_roc_curves(results, labels, "ROC Curves Comparison")
            .map_err(anyhow::Error::msg)?;
        plot_section.add_plot(roc_plot);
        report.add_section(plot_section);
    }

    /* Section 3: Best model */
    {
        let mut best_section = ReportSection::new("Best Model Analysis");
        best_section.add_content(html! {
            table {
                tr { th { "Best Model" } td { (display_name(best)) } }
                tr { th { "ROC-AUC Score" } td { (format!("{:.3}", best_result.roc_auc)) } }
                tr { th { "Accuracy" } td { (format!("{:.3}", best_result.accuracy)) } }
                tr { th { "Precision" } td { (format!("{:.3}", best_result.precision)) } }
                tr { th { "Recall" } td { (format!("{:.3}", best_result.recall)) } }
                tr { th { "F1-Score" } td { (format!("{:.3}", best_result.f1_score)) } }
            }
        });
        report.add_section(best_section);
    }

    Ok(report)
}

fn alert_class(alert: AlertLevel) -> &'static str {
    match alert {
        AlertLevel::Critical => "critical",
        AlertLevel::Elevated => "warning",
        AlertLevel::Healthy => "best",
    }
}

fn segment_table(heading: &str, segments: &[SegmentStats]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { (heading) }
                    th { "Customers" }
                    th { "Churned" }
                    th { "Churn Rate" }
                    th { "Risk" }
                }
            }
            tbody {
                @for stats in segments {
                    @let class = match stats.risk {
                        SegmentRisk::High => "risk-high",
                        SegmentRisk::Moderate => "risk-moderate",
                        SegmentRisk::Low => "risk-low",
                    };
                    tr {
                        td { (stats.segment) }
                        td { (stats.customers) }
                        td { (stats.churned) }
                        td { (format!("{:.1}%", stats.churn_rate * 100.0)) }
                        td class=(class) { (format!("{:?}", stats.risk)) }
                    }
                }
            }
        }
    }
}

/// Build the customer base summary page from a segment analysis.
pub fn build_summary_report(analysis: &SegmentAnalysis) -> Report {
    let overview = &analysis.overview;
    let mut report = Report::new("Customer Churn Summary");

    /* Section 1: Key figures */
    {
        let mut kpi_section = ReportSection::new("Key Metrics");
        kpi_section.add_content(html! {
            table {
                tr { th { "Total Customers" } td { (overview.total_customers) } }
                tr { th { "Churned Customers" } td { (overview.churned_customers) } }
                tr { th { "Churn Rate" } td { (format!("{:.1}%", overview.churn_rate * 100.0)) } }
                tr {
                    th { "Avg Monthly Charges" }
                    td { (format!("${:.2}", overview.avg_monthly_charges)) }
                }
            }
            div class=(alert_class(overview.alert)) {
                "Churn alert level: "
                strong { (format!("{:?}", overview.alert)) }
            }
        });
        report.add_section(kpi_section);
    }

    /* Section 2: Contracts */
    {
        let mut contract_section = ReportSection::new("Churn by Contract Type");
        contract_section.add_content(segment_table("Contract", &analysis.by_contract));
        contract_section.add_plot(plot_segment_churn(
            &analysis.by_contract,
            "Churn Rate by Contract Type",
            "Contract Type",
        ));
        report.add_section(contract_section);
    }

    /* Section 3: Payment methods */
    {
        let mut payment_section = ReportSection::new("Churn by Payment Method");
        payment_section.add_content(segment_table("Payment Method", &analysis.by_payment_method));
        payment_section.add_plot(plot_segment_churn(
            &analysis.by_payment_method,
            "Churn Rate by Payment Method",
            "Payment Method",
        ));
        report.add_section(payment_section);
    }

    /* Section 4: Tenure */
    {
        let mut tenure_section = ReportSection::new("Tenure Distribution");
        tenure_section.add_plot(plot_tenure_distribution(
            &analysis.tenure,
            "Tenure Distribution by Churn Status",
        ));
        report.add_section(tenure_section);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(display_name("logistic_regression"), "Logistic Regression");
        assert_eq!(display_name("xgboost"), "Xgboost");
        assert_eq!(display_name("random__forest"), "Random Forest");
    }

    #[test]
    fn report_renders_sections() {
        let mut report = Report::new("Test Report");
        let mut section = ReportSection::new("Overview");
        section.add_content(html! { p { "hello <world>" } });
        report.add_section(section);
        let page = report.render();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<h2>Overview</h2>"));
        assert!(page.contains("hello &lt;world&gt;"));
    }

    #[test]
    fn summary_report_lists_segments_and_alert() {
        use crate::data_handling::CustomerRecord;
        use crate::summary::analyze;

        let record = |contract: &str, churned: bool| CustomerRecord {
            contract: contract.to_string(),
            payment_method: "Mailed check".to_string(),
            tenure_months: if churned { 2 } else { 40 },
            monthly_charges: 50.0,
            churned,
        };
        let records = vec![
            record("Month-to-month", true),
            record("Month-to-month", false),
            record("Two year", false),
            record("Two year", false),
        ];
        let page = build_summary_report(&analyze(&records).unwrap()).render();
        assert!(page.contains("<h2>Churn by Contract Type</h2>"));
        assert!(page.contains("<h2>Tenure Distribution</h2>"));
        assert!(page.contains("Month-to-month"));
        assert!(page.contains("50.0%"));
        assert!(page.contains("Elevated"));
    }
}

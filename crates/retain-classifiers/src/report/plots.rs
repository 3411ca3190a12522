use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, BarMode, Layout, Legend};
use plotly::{Bar, Plot, Scatter};

use crate::evaluation::{roc_curves, EvaluationResults};
use crate::summary::{SegmentStats, TenureHistogram};
use crate::report::report::display_name;

/// Grouped bar chart of accuracy and ROC-AUC per model.
pub fn plot_performance_comparison(results: &EvaluationResults, title: &str) -> Plot {
    let models: Vec<String> = results.names().iter().map(|n| display_name(n)).collect();
    let accuracies: Vec<f64> = results.iter().map(|(_, r)| r.accuracy).collect();
    let roc_aucs: Vec<f64> = results.iter().map(|(_, r)| r.roc_auc).collect();

    let trace_accuracy = Bar::new(models.clone(), accuracies)
        .name("Accuracy")
        .opacity(0.8);
    let trace_auc = Bar::new(models, roc_aucs).name("ROC-AUC").opacity(0.8);

    let layout = Layout::new()
        .title(title)
        .bar_mode(BarMode::Group)
        .x_axis(Axis::new().title("Models"))
        .y_axis(Axis::new().title("Score").range(vec![0.0, 1.0]));

    let mut plot = Plot::new();
    plot.add_trace(trace_accuracy);
    plot.add_trace(trace_auc);
    plot.set_layout(layout);
    plot
}

/// Churn rate per segment, one bar each, in percent.
pub fn plot_segment_churn(segments: &[SegmentStats], title: &str, axis_title: &str) -> Plot {
    let names: Vec<String> = segments.iter().map(|s| s.segment.clone()).collect();
    let rates: Vec<f64> = segments.iter().map(|s| s.churn_rate * 100.0).collect();
    let labels: Vec<String> = rates.iter().map(|rate| format!("{:.1}%", rate)).collect();

    let trace = Bar::new(names, rates)
        .name("Churn Rate")
        .text_array(labels)
        .opacity(0.8);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title(axis_title))
            .y_axis(Axis::new().title("Churn Rate (%)")),
    );
    plot
}

/// Overlaid tenure histograms of retained and churned customers.
pub fn plot_tenure_distribution(histogram: &TenureHistogram, title: &str) -> Plot {
    let centers: Vec<f64> = histogram
        .bin_edges
        .windows(2)
        .map(|edges| (edges[0] + edges[1]) / 2.0)
        .collect();

    let retained = Bar::new(centers.clone(), histogram.retained.clone())
        .name("Retained")
        .opacity(0.7);
    let churned = Bar::new(centers, histogram.churned.clone())
        .name("Churned")
        .opacity(0.7);

    let mut plot = Plot::new();
    plot.add_trace(retained);
    plot.add_trace(churned);
    plot.set_layout(
        Layout::new()
            .title(title)
            .bar_mode(BarMode::Overlay)
            .x_axis(Axis::new().title("Tenure (months)"))
            .y_axis(Axis::new().title("Customers")),
    );
    plot
}

/// ROC curve per model against the random-classifier diagonal.
pub fn plot_roc_curves(
    results: &EvaluationResults,
    labels: &[u8],
    title: &str,
) -> Result<Plot, String> {
    if let Some((name, _)) = results
        .iter()
        .find(|(_, r)| r.predicted_probabilities.len() != labels.len())
    {
        return Err(format!(
            "Probabilities of '{}' are not aligned with the {} labels",
            name,
            labels.len()
        ));
    }

    let mut plot = Plot::new();
    for (name, curve) in roc_curves(results, labels) {
        let auc = results.get(&name).map(|r| r.roc_auc).unwrap_or_else(|| curve.auc());
        let trace = Scatter::new(curve.fpr(), curve.tpr())
            .mode(Mode::Lines)
            .name(&format!("{} (AUC = {:.3})", display_name(&name), auc));
        plot.add_trace(trace);
    }

    let reference_line = Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .name("Random Classifier")
        .line(Line::new().color("black").dash(DashType::Dash));
    plot.add_trace(reference_line);

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("False Positive Rate").range(vec![0.0, 1.0]))
            .y_axis(Axis::new().title("True Positive Rate").range(vec![0.0, 1.0]))
            .legend(Legend::new().x(0.6).y(0.05)),
    );

    Ok(plot)
}

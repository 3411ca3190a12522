//! Model performance review and customer summary output.
//!
//! Plotly charts and maud-rendered HTML pages summarizing an evaluation run
//! or the customer base.
pub mod plots;
pub mod report;

pub use report::{
    build_evaluation_report, build_summary_report, display_name, Report, ReportSection,
};

//! Descriptive churn summary over the cleaned customer table.
//!
//! Headline counts with an alert level, churn rate per contract type and per
//! payment method, and the tenure distribution of churned against retained
//! customers.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::data_handling::CustomerRecord;
use crate::error::RetainError;

/// Number of tenure bins in the default distribution.
pub const TENURE_BINS: usize = 24;

/// Overall churn rate band.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Healthy,
    Elevated,
    Critical,
}

impl AlertLevel {
    /// Critical above 25%, elevated above 15%.
    pub fn from_churn_rate(rate: f64) -> Self {
        if rate > 0.25 {
            AlertLevel::Critical
        } else if rate > 0.15 {
            AlertLevel::Elevated
        } else {
            AlertLevel::Healthy
        }
    }
}

/// Churn rate band of one segment.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentRisk {
    Low,
    Moderate,
    High,
}

impl SegmentRisk {
    /// High above 40%, moderate above 20%.
    pub fn from_churn_rate(rate: f64) -> Self {
        if rate > 0.4 {
            SegmentRisk::High
        } else if rate > 0.2 {
            SegmentRisk::Moderate
        } else {
            SegmentRisk::Low
        }
    }
}

/// Headline figures for the whole customer base.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DataSummary {
    pub total_customers: usize,
    pub churned_customers: usize,
    pub churn_rate: f64,
    pub avg_monthly_charges: f64,
    pub alert: AlertLevel,
}

/// Customer count and churn rate of one segment.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SegmentStats {
    pub segment: String,
    pub customers: usize,
    pub churned: usize,
    pub churn_rate: f64,
    pub risk: SegmentRisk,
}

/// Equal-width tenure bins with churned and retained counts per bin.
///
/// `bin_edges` has one more entry than each count vector. Every bin is
/// half-open except the last, which includes its upper edge.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TenureHistogram {
    pub bin_edges: Vec<f64>,
    pub retained: Vec<usize>,
    pub churned: Vec<usize>,
}

impl TenureHistogram {
    pub fn n_bins(&self) -> usize {
        self.retained.len()
    }
}

/// Everything the summary report and the `summary` command show.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SegmentAnalysis {
    pub overview: DataSummary,
    pub by_contract: Vec<SegmentStats>,
    pub by_payment_method: Vec<SegmentStats>,
    pub tenure: TenureHistogram,
}

fn require_records(records: &[CustomerRecord]) -> Result<(), RetainError> {
    if records.is_empty() {
        return Err(RetainError::InvalidInput(
            "customer data contains no records".to_string(),
        ));
    }
    Ok(())
}

/// Totals, churn rate and average monthly charges.
pub fn summarize(records: &[CustomerRecord]) -> Result<DataSummary, RetainError> {
    require_records(records)?;
    let total = records.len();
    let churned = records.iter().filter(|r| r.churned).count();
    let churn_rate = churned as f64 / total as f64;
    let avg_monthly_charges =
        records.iter().map(|r| r.monthly_charges).sum::<f64>() / total as f64;

    Ok(DataSummary {
        total_customers: total,
        churned_customers: churned,
        churn_rate,
        avg_monthly_charges,
        alert: AlertLevel::from_churn_rate(churn_rate),
    })
}

/// Churn statistics grouped by `key`, ordered alphabetically by segment.
pub fn churn_by_segment<F>(records: &[CustomerRecord], key: F) -> Vec<SegmentStats>
where
    F: Fn(&CustomerRecord) -> &str,
{
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = counts.entry(key(record)).or_insert((0, 0));
        entry.0 += 1;
        if record.churned {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(segment, (customers, churned))| {
            let churn_rate = churned as f64 / customers as f64;
            SegmentStats {
                segment: segment.to_string(),
                customers,
                churned,
                churn_rate,
                risk: SegmentRisk::from_churn_rate(churn_rate),
            }
        })
        .collect()
}

pub fn churn_by_contract(records: &[CustomerRecord]) -> Vec<SegmentStats> {
    churn_by_segment(records, |r| r.contract.as_str())
}

pub fn churn_by_payment_method(records: &[CustomerRecord]) -> Vec<SegmentStats> {
    churn_by_segment(records, |r| r.payment_method.as_str())
}

/// Split tenure into `bins` equal-width bins spanning the observed range.
///
/// When every customer has the same tenure the range is widened by half a
/// month on each side.
pub fn tenure_distribution(
    records: &[CustomerRecord],
    bins: usize,
) -> Result<TenureHistogram, RetainError> {
    require_records(records)?;
    if bins == 0 {
        return Err(RetainError::InvalidInput(
            "tenure distribution needs at least one bin".to_string(),
        ));
    }

    let (min, max) = records.iter().fold((u32::MAX, 0u32), |(lo, hi), r| {
        (lo.min(r.tenure_months), hi.max(r.tenure_months))
    });
    let (lo, hi) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (hi - lo) / bins as f64;
    let bin_edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut retained = vec![0; bins];
    let mut churned = vec![0; bins];
    for record in records {
        let offset = (record.tenure_months as f64 - lo) / width;
        let idx = (offset.floor() as usize).min(bins - 1);
        if record.churned {
            churned[idx] += 1;
        } else {
            retained[idx] += 1;
        }
    }

    Ok(TenureHistogram {
        bin_edges,
        retained,
        churned,
    })
}

/// Overview, contract and payment breakdowns and tenure distribution.
pub fn analyze(records: &[CustomerRecord]) -> Result<SegmentAnalysis, RetainError> {
    let overview = summarize(records)?;
    let tenure = tenure_distribution(records, TENURE_BINS)?;
    log::debug!(
        "Summarized {} customers (churn rate {:.1}%)",
        overview.total_customers,
        overview.churn_rate * 100.0
    );
    Ok(SegmentAnalysis {
        overview,
        by_contract: churn_by_contract(records),
        by_payment_method: churn_by_payment_method(records),
        tenure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(
        contract: &str,
        payment: &str,
        tenure: u32,
        charges: f64,
        churned: bool,
    ) -> CustomerRecord {
        CustomerRecord {
            contract: contract.to_string(),
            payment_method: payment.to_string(),
            tenure_months: tenure,
            monthly_charges: charges,
            churned,
        }
    }

    fn sample() -> Vec<CustomerRecord> {
        vec![
            customer("Month-to-month", "Electronic check", 1, 80.0, true),
            customer("Month-to-month", "Electronic check", 3, 90.0, true),
            customer("Month-to-month", "Mailed check", 10, 50.0, false),
            customer("Month-to-month", "Credit card (automatic)", 20, 60.0, true),
            customer("One year", "Mailed check", 30, 40.0, false),
            customer("One year", "Bank transfer (automatic)", 40, 70.0, true),
            customer("One year", "Credit card (automatic)", 50, 30.0, false),
            customer("Two year", "Bank transfer (automatic)", 60, 20.0, false),
            customer("Two year", "Credit card (automatic)", 72, 30.0, false),
            customer("Two year", "Mailed check", 72, 30.0, false),
        ]
    }

    #[test]
    fn overview_counts_and_alert() {
        let summary = summarize(&sample()).unwrap();
        assert_eq!(summary.total_customers, 10);
        assert_eq!(summary.churned_customers, 4);
        assert!((summary.churn_rate - 0.4).abs() < 1e-12);
        assert!((summary.avg_monthly_charges - 50.0).abs() < 1e-12);
        assert_eq!(summary.alert, AlertLevel::Critical);
    }

    #[test]
    fn alert_and_segment_bands_are_strict() {
        assert_eq!(AlertLevel::from_churn_rate(0.15), AlertLevel::Healthy);
        assert_eq!(AlertLevel::from_churn_rate(0.151), AlertLevel::Elevated);
        assert_eq!(AlertLevel::from_churn_rate(0.25), AlertLevel::Elevated);
        assert_eq!(AlertLevel::from_churn_rate(0.26), AlertLevel::Critical);

        assert_eq!(SegmentRisk::from_churn_rate(0.2), SegmentRisk::Low);
        assert_eq!(SegmentRisk::from_churn_rate(0.3), SegmentRisk::Moderate);
        assert_eq!(SegmentRisk::from_churn_rate(0.4), SegmentRisk::Moderate);
        assert_eq!(SegmentRisk::from_churn_rate(0.75), SegmentRisk::High);
    }

    #[test]
    fn contract_rates_are_per_segment() {
        let by_contract = churn_by_contract(&sample());
        let segments: Vec<&str> = by_contract.iter().map(|s| s.segment.as_str()).collect();
        assert_eq!(segments, vec!["Month-to-month", "One year", "Two year"]);

        let m2m = &by_contract[0];
        assert_eq!((m2m.customers, m2m.churned), (4, 3));
        assert!((m2m.churn_rate - 0.75).abs() < 1e-12);
        assert_eq!(m2m.risk, SegmentRisk::High);

        let one_year = &by_contract[1];
        assert_eq!((one_year.customers, one_year.churned), (3, 1));
        assert!((one_year.churn_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(one_year.risk, SegmentRisk::Moderate);

        let two_year = &by_contract[2];
        assert_eq!(two_year.churned, 0);
        assert_eq!(two_year.risk, SegmentRisk::Low);
    }

    #[test]
    fn payment_rates_are_per_segment() {
        let by_payment = churn_by_payment_method(&sample());
        let rate = |name: &str| {
            by_payment
                .iter()
                .find(|s| s.segment == name)
                .map(|s| s.churn_rate)
                .unwrap()
        };
        assert_eq!(by_payment.len(), 4);
        assert!((rate("Electronic check") - 1.0).abs() < 1e-12);
        assert!((rate("Bank transfer (automatic)") - 0.5).abs() < 1e-12);
        assert!((rate("Credit card (automatic)") - 1.0 / 3.0).abs() < 1e-12);
        assert!(rate("Mailed check").abs() < 1e-12);
    }

    #[test]
    fn tenure_bins_split_churned_and_retained() {
        let hist = tenure_distribution(&sample(), TENURE_BINS).unwrap();
        assert_eq!(hist.n_bins(), TENURE_BINS);
        assert_eq!(hist.bin_edges.len(), TENURE_BINS + 1);
        assert_eq!(hist.bin_edges[0], 1.0);
        assert!((hist.bin_edges[TENURE_BINS] - 72.0).abs() < 1e-9);
        assert_eq!(hist.churned.iter().sum::<usize>(), 4);
        assert_eq!(hist.retained.iter().sum::<usize>(), 6);
        // tenure 1 and 3 share the first bin (width 71/24)
        assert_eq!(hist.churned[0], 2);
        // both 72-month customers land in the closed last bin
        assert_eq!(hist.retained[TENURE_BINS - 1], 2);
    }

    #[test]
    fn tenure_single_value_and_empty_input() {
        let same = vec![customer("Two year", "Mailed check", 12, 20.0, false); 3];
        let hist = tenure_distribution(&same, 4).unwrap();
        assert_eq!(hist.bin_edges.first(), Some(&11.5));
        assert_eq!(hist.bin_edges.last(), Some(&12.5));
        assert_eq!(hist.retained.iter().sum::<usize>(), 3);

        assert!(matches!(
            tenure_distribution(&same, 0),
            Err(RetainError::InvalidInput(_))
        ));
        assert!(matches!(summarize(&[]), Err(RetainError::InvalidInput(_))));
        assert!(analyze(&[]).is_err());
    }
}

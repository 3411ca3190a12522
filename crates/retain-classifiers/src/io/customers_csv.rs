//! CSV reader for the cleaned customer table used by the segment summary.
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::StringRecord;

use crate::data_handling::CustomerRecord;
use crate::io::churn_csv::{find_column, parse_label};

const CONTRACT: &str = "Contract";
const PAYMENT_METHOD: &str = "PaymentMethod";
const TENURE: &str = "tenure";
const MONTHLY_CHARGES: &str = "MonthlyCharges";
const CHURN: &str = "Churn";

struct Columns {
    contract: usize,
    payment_method: usize,
    tenure: usize,
    monthly_charges: usize,
    churn: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let column = |name: &str| {
            find_column(headers, name).ok_or_else(|| anyhow!("Missing column '{}'", name))
        };
        Ok(Columns {
            contract: column(CONTRACT)?,
            payment_method: column(PAYMENT_METHOD)?,
            tenure: column(TENURE)?,
            monthly_charges: column(MONTHLY_CHARGES)?,
            churn: column(CHURN)?,
        })
    }
}

/// Read customer records from a cleaned churn CSV.
///
/// Only `Contract`, `PaymentMethod`, `tenure`, `MonthlyCharges` and `Churn`
/// are read; other columns are ignored. Header lookup is case-insensitive.
pub fn read_customer_records<P: AsRef<Path>>(path: P) -> Result<Vec<CustomerRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open customer data: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read customer data header row")?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Failed to read row {}", row))?;
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| anyhow!("Missing {} value at row {}", name, row))
        };

        let tenure: f64 = field(columns.tenure, TENURE)?
            .parse()
            .with_context(|| format!("Invalid tenure at row {}", row))?;
        if !tenure.is_finite() || tenure < 0.0 {
            bail!("Invalid tenure at row {}: {}", row, tenure);
        }
        let monthly_charges: f64 = field(columns.monthly_charges, MONTHLY_CHARGES)?
            .parse()
            .with_context(|| format!("Invalid monthly charges at row {}", row))?;
        if !monthly_charges.is_finite() {
            bail!("Invalid monthly charges at row {}: {}", row, monthly_charges);
        }
        let churned = parse_label(field(columns.churn, CHURN)?)
            .with_context(|| format!("Invalid churn label at row {}", row))?
            == 1;

        records.push(CustomerRecord {
            contract: field(columns.contract, CONTRACT)?.to_string(),
            payment_method: field(columns.payment_method, PAYMENT_METHOD)?.to_string(),
            tenure_months: tenure.round() as u32,
            monthly_charges,
            churned,
        });
    }

    if records.is_empty() {
        bail!("Customer data {} contains no rows", path.as_ref().display());
    }
    log::debug!(
        "Read {} customer records from {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(records)
}

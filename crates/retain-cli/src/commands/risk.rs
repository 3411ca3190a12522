//! CLI helpers for the rule-based risk scorer.
use anyhow::{Context, Result};
use serde::Serialize;

use retain_classifiers::risk::{self, CustomerProfile, RiskAssessment, RiskFactor};

/// Everything `retain risk` reports for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub profile: CustomerProfile,
    pub factors: Vec<RiskFactor>,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
}

/// Validate `profile` and score it.
pub fn run_risk(profile: CustomerProfile) -> Result<RiskReport> {
    profile.validate().context("Invalid customer profile")?;
    let factors = risk::risk_factors(&profile);
    let assessment = risk::assess(&profile);
    log::debug!(
        "Scored profile with {} applied factors: {:.3}",
        factors.len(),
        assessment.score
    );
    Ok(RiskReport {
        profile,
        factors,
        assessment,
    })
}

/// Plain-text rendering used on stdout.
pub fn format_risk_report(report: &RiskReport) -> String {
    let a = &report.assessment;
    let mut out = String::new();
    out.push_str(&format!(
        "{} CHURN RISK: {:.0}%\n\n",
        a.tier,
        a.score * 100.0
    ));
    out.push_str(&format!("  {:<32} {:>+6.2}\n", "base rate", risk::BASE_RISK));
    for factor in &report.factors {
        out.push_str(&format!("  {:<32} {:>+6.2}\n", factor.label, factor.delta));
    }
    out.push_str(&format!("  {:<32} {:>6.2}\n\n", "score (clamped)", a.score));
    out.push_str(&format!("Annual customer value:  ${:.0}\n", a.annual_value));
    out.push_str(&format!("Lifetime value to date: ${:.0}\n", a.lifetime_value));
    out.push_str(&format!("Est. retention cost:    ${:.0}\n", a.retention_cost));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_classifiers::risk::{ContractType, InternetService, PaymentMethod, RiskTier};

    fn profile() -> CustomerProfile {
        CustomerProfile {
            tenure_months: 3,
            monthly_charges: 95.0,
            contract: ContractType::MonthToMonth,
            payment_method: PaymentMethod::ElectronicCheck,
            senior_citizen: true,
            internet_service: InternetService::FiberOptic,
        }
    }

    #[test]
    fn report_lists_every_factor() {
        let report = run_risk(profile()).unwrap();
        assert_eq!(report.assessment.tier, RiskTier::High);
        let text = format_risk_report(&report);
        assert!(text.starts_with("HIGH CHURN RISK: 95%"));
        assert!(text.contains("month-to-month contract"));
        assert!(text.contains("fiber optic internet"));
        assert!(text.contains("Annual customer value:  $1140"));
    }

    #[test]
    fn out_of_range_profile_is_rejected() {
        let bad = CustomerProfile {
            tenure_months: 100,
            ..profile()
        };
        let err = run_risk(bad).unwrap_err();
        assert!(format!("{:#}", err).contains("tenure_months"));
    }

    #[test]
    fn json_flattens_assessment() {
        let report = run_risk(profile()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tier"], "HIGH");
        assert_eq!(json["score"], 0.95);
        assert_eq!(json["profile"]["contract"], "month-to-month");
        assert_eq!(json["factors"].as_array().unwrap().len(), 6);
    }
}

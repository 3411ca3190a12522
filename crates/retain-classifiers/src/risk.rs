//! Rule-based churn risk scoring.
//!
//! The score is an additive point system: a base rate plus independent
//! adjustments for contract, tenure, payment method, monthly charges,
//! senior status and internet service, clamped to [`MIN_RISK`, `MAX_RISK`].
//! No trained model is involved, so a score is available instantly for
//! "what-if" questions.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RetainError;

pub const BASE_RISK: f64 = 0.15;
pub const MIN_RISK: f64 = 0.01;
pub const MAX_RISK: f64 = 0.95;

// Rule deltas are summed in whole points (hundredths of probability) and
// converted once, after clamping.
const BASE_POINTS: i32 = 15;
const MIN_POINTS: i32 = 1;
const MAX_POINTS: i32 = 95;

/// Upper bound (inclusive) of the LOW tier.
pub const LOW_TIER_MAX: f64 = 0.35;
/// Upper bound (inclusive) of the MEDIUM tier.
pub const MEDIUM_TIER_MAX: f64 = 0.65;

pub const MAX_TENURE_MONTHS: u32 = 72;
pub const MIN_MONTHLY_CHARGES: f64 = 18.0;
pub const MAX_MONTHLY_CHARGES: f64 = 120.0;

/// Share of the annual value assumed to be spent on a retention offer.
pub const RETENTION_COST_RATE: f64 = 0.15;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ContractType {
    MonthToMonth,
    OneYear,
    TwoYear,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    ElectronicCheck,
    MailedCheck,
    BankTransferAuto,
    CreditCardAuto,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InternetService {
    None,
    Dsl,
    FiberOptic,
}

/// Lowercase and collapse separators so that `Month-to-month`,
/// `month_to_month` and `Bank transfer (automatic)` all normalize.
fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "month-to-month" => Ok(ContractType::MonthToMonth),
            "one-year" => Ok(ContractType::OneYear),
            "two-year" => Ok(ContractType::TwoYear),
            _ => Err(format!(
                "Unknown contract type: {}. Expected month-to-month, one-year or two-year",
                s
            )),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "electronic-check" => Ok(PaymentMethod::ElectronicCheck),
            "mailed-check" => Ok(PaymentMethod::MailedCheck),
            "bank-transfer-auto" | "bank-transfer-automatic" => Ok(PaymentMethod::BankTransferAuto),
            "credit-card-auto" | "credit-card-automatic" => Ok(PaymentMethod::CreditCardAuto),
            _ => Err(format!(
                "Unknown payment method: {}. Expected electronic-check, mailed-check, \
                 bank-transfer-auto or credit-card-auto",
                s
            )),
        }
    }
}

impl FromStr for InternetService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "none" | "no" => Ok(InternetService::None),
            "dsl" => Ok(InternetService::Dsl),
            "fiber-optic" => Ok(InternetService::FiberOptic),
            _ => Err(format!(
                "Unknown internet service: {}. Expected none, dsl or fiber-optic",
                s
            )),
        }
    }
}

/// Customer attributes consumed by [`score`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub tenure_months: u32,
    pub monthly_charges: f64,
    pub contract: ContractType,
    pub payment_method: PaymentMethod,
    pub senior_citizen: bool,
    pub internet_service: InternetService,
}

impl CustomerProfile {
    /// Check the profile against the input domains.
    ///
    /// [`score`] never calls this; it is meant for the boundary that builds
    /// profiles from user input.
    pub fn validate(&self) -> Result<(), RetainError> {
        if self.tenure_months > MAX_TENURE_MONTHS {
            return Err(RetainError::InvalidInput(format!(
                "tenure_months must be within [0, {}], got {}",
                MAX_TENURE_MONTHS, self.tenure_months
            )));
        }
        if !self.monthly_charges.is_finite()
            || self.monthly_charges < MIN_MONTHLY_CHARGES
            || self.monthly_charges > MAX_MONTHLY_CHARGES
        {
            return Err(RetainError::InvalidInput(format!(
                "monthly_charges must be within [{:.1}, {:.1}], got {}",
                MIN_MONTHLY_CHARGES, MAX_MONTHLY_CHARGES, self.monthly_charges
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        if score > MEDIUM_TIER_MAX {
            RiskTier::High
        } else if score > LOW_TIER_MAX {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "LOW"),
            RiskTier::Medium => write!(f, "MEDIUM"),
            RiskTier::High => write!(f, "HIGH"),
        }
    }
}

struct RiskRule {
    label: &'static str,
    applies: fn(&CustomerProfile) -> bool,
    points: i32,
}

// Table order is summation order. Rules within a group are mutually exclusive.
const RULES: &[RiskRule] = &[
    RiskRule {
        label: "month-to-month contract",
        applies: |p| p.contract == ContractType::MonthToMonth,
        points: 35,
    },
    RiskRule {
        label: "one-year contract",
        applies: |p| p.contract == ContractType::OneYear,
        points: 10,
    },
    RiskRule {
        label: "two-year contract",
        applies: |p| p.contract == ContractType::TwoYear,
        points: 5,
    },
    RiskRule {
        label: "tenure of 6 months or less",
        applies: |p| p.tenure_months <= 6,
        points: 25,
    },
    RiskRule {
        label: "tenure of 7 to 12 months",
        applies: |p| p.tenure_months > 6 && p.tenure_months <= 12,
        points: 15,
    },
    RiskRule {
        label: "tenure over 36 months",
        applies: |p| p.tenure_months > 36,
        points: -10,
    },
    RiskRule {
        label: "electronic check payment",
        applies: |p| p.payment_method == PaymentMethod::ElectronicCheck,
        points: 12,
    },
    RiskRule {
        label: "automatic payment",
        applies: |p| {
            matches!(
                p.payment_method,
                PaymentMethod::BankTransferAuto | PaymentMethod::CreditCardAuto
            )
        },
        points: -5,
    },
    RiskRule {
        label: "monthly charges over 80",
        applies: |p| p.monthly_charges > 80.0,
        points: 8,
    },
    RiskRule {
        label: "monthly charges under 30",
        applies: |p| p.monthly_charges < 30.0,
        points: -3,
    },
    RiskRule {
        label: "senior citizen",
        applies: |p| p.senior_citizen,
        points: 4,
    },
    RiskRule {
        label: "fiber optic internet",
        applies: |p| p.internet_service == InternetService::FiberOptic,
        points: 3,
    },
];

/// One applied adjustment of the point system.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RiskFactor {
    pub label: &'static str,
    pub delta: f64,
}

/// The adjustments that apply to `profile`, in summation order.
pub fn risk_factors(profile: &CustomerProfile) -> Vec<RiskFactor> {
    applied_rules(profile)
        .map(|rule| RiskFactor {
            label: rule.label,
            delta: points_to_probability(rule.points),
        })
        .collect()
}

fn applied_rules(profile: &CustomerProfile) -> impl Iterator<Item = &'static RiskRule> + '_ {
    RULES.iter().filter(move |rule| (rule.applies)(profile))
}

fn points_to_probability(points: i32) -> f64 {
    points as f64 / 100.0
}

/// Churn probability for `profile`, always within [`MIN_RISK`, `MAX_RISK`].
pub fn score(profile: &CustomerProfile) -> f64 {
    let points = applied_rules(profile).fold(BASE_POINTS, |acc, rule| acc + rule.points);
    points_to_probability(points.clamp(MIN_POINTS, MAX_POINTS))
}

/// Score, tier and the financial figures shown next to them.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub tier: RiskTier,
    pub annual_value: f64,
    pub lifetime_value: f64,
    pub retention_cost: f64,
}

pub fn assess(profile: &CustomerProfile) -> RiskAssessment {
    let score = score(profile);
    let annual_value = profile.monthly_charges * 12.0;
    RiskAssessment {
        score,
        tier: RiskTier::from_score(score),
        annual_value,
        lifetime_value: profile.monthly_charges * profile.tenure_months as f64,
        retention_cost: annual_value * RETENTION_COST_RATE,
    }
}

use super::obligation::{ComplianceObligation, ObligationStatus};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate view over a list of tracked obligations.
///
/// `pending` is everything not yet filed, so it includes overdue
/// obligations; `overdue` is reported separately and overlaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub total: usize,
    pub pending: usize,
    pub submitted: usize,
    pub overdue: usize,
    /// Percentage of obligations filed, 0-100
    pub compliance_score: u32,
}

impl ComplianceStatus {
    pub fn risk_level(&self) -> RiskLevel {
        calculate_risk_level(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

fn is_overdue(obligation: &ComplianceObligation, now: DateTime<Utc>) -> bool {
    match obligation.status {
        ObligationStatus::Overdue => true,
        ObligationStatus::Pending => obligation.is_past_due(now),
        ObligationStatus::Submitted | ObligationStatus::Approved => false,
    }
}

/// Round-half-up percentage of `part` in `whole`
fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 100;
    }
    ((part * 200 + whole) / (whole * 2)) as u32
}

pub fn get_compliance_status(obligations: &[ComplianceObligation], now: DateTime<Utc>) -> ComplianceStatus {
    let total = obligations.len();
    let submitted = obligations.iter().filter(|o| o.status.is_filed()).count();
    let overdue = obligations.iter().filter(|o| is_overdue(o, now)).count();

    ComplianceStatus {
        total,
        pending: total - submitted,
        submitted,
        overdue,
        compliance_score: percentage(submitted, total),
    }
}

/// Any obligation past its due date that is still pending or flagged overdue
pub fn has_overdue_obligations(obligations: &[ComplianceObligation], now: DateTime<Utc>) -> bool {
    obligations.iter().any(|o| {
        o.is_past_due(now)
            && matches!(o.status, ObligationStatus::Pending | ObligationStatus::Overdue)
    })
}

/// Overdue obligations dominate; otherwise the score decides.
pub fn calculate_risk_level(status: &ComplianceStatus) -> RiskLevel {
    if status.overdue > 0 {
        RiskLevel::Critical
    } else if status.compliance_score < 50 {
        RiskLevel::High
    } else if status.compliance_score < 80 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

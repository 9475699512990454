//! Financial return (SROI) criterion.

use serde::{Deserialize, Serialize};

use super::CriterionError;
use crate::domain::ProjectProfile;

pub const REJECTION_THRESHOLD: f64 = 1.0;
pub const SOLID_RETURN_THRESHOLD: f64 = 2.0;
pub const STRONG_RETURN_THRESHOLD: f64 = 3.0;
pub const JUSTIFICATION_THRESHOLD: f64 = 5.0;
pub const VERIFICATION_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAssessment {
    pub ratio: f64,
    pub assumed: bool,
    pub score: f64,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Piecewise SROI scale: below 1.0 rejects, then 60 / 80 / 95.
pub fn score_ratio(ratio: f64) -> Result<f64, CriterionError> {
    if ratio.is_nan() || ratio.is_infinite() {
        return Err(CriterionError::invalid(
            "financial_return_ratio",
            format!("expected a finite number, found {ratio}"),
        ));
    }
    if ratio < 0.0 {
        return Err(CriterionError::invalid(
            "financial_return_ratio",
            format!("ratio cannot be negative (found {ratio:.2})"),
        ));
    }

    let score = if ratio < REJECTION_THRESHOLD {
        0.0
    } else if ratio < SOLID_RETURN_THRESHOLD {
        60.0
    } else if ratio < STRONG_RETURN_THRESHOLD {
        80.0
    } else {
        95.0
    };

    Ok(score)
}

pub fn assess(profile: &ProjectProfile) -> Result<FinancialAssessment, CriterionError> {
    let ratio = profile.financial_return_ratio;
    let score = score_ratio(ratio)?;

    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();

    if ratio < REJECTION_THRESHOLD {
        alerts.push(format!(
            "SROI {ratio:.2} is below {REJECTION_THRESHOLD:.1}: the project returns less social value than it costs and is rejected"
        ));
    } else if ratio < SOLID_RETURN_THRESHOLD {
        alerts.push(format!(
            "SROI {ratio:.2} is marginal: social value barely exceeds the investment"
        ));
    }

    if ratio > VERIFICATION_THRESHOLD {
        alerts.push(format!(
            "SROI {ratio:.2} exceeds {VERIFICATION_THRESHOLD:.1}: verify the calculation methodology"
        ));
    } else if ratio > JUSTIFICATION_THRESHOLD && profile.financial_return_justification.is_none()
    {
        alerts.push(format!(
            "SROI {ratio:.2} is above {JUSTIFICATION_THRESHOLD:.1}: attach a justification note documenting the estimate"
        ));
    }

    if profile.financial_return_assumed {
        recommendations.push(format!(
            "Report a measured SROI; {ratio:.2} was assumed for this evaluation"
        ));
    }

    Ok(FinancialAssessment {
        ratio,
        assumed: profile.financial_return_assumed,
        score,
        alerts,
        recommendations,
    })
}

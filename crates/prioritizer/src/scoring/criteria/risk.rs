//! Risk criterion: probability x impact severity per dimension, inverted to a
//! 0-100 scale and blended with contextual risk factors derived from the project.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{is_geo_priority, validate_scale, CriterionError};
use crate::domain::{ProjectProfile, RiskDimension, RiskRating, StakeholderType};
use crate::geo::{normalize_key, GeoPriorityTable};
use crate::scoring::config::{tier_deduction, RiskPolicy};

pub const MAX_SEVERITY: u8 = 25;
/// Inverse score of a dimension whose probability or impact is missing.
pub const NEUTRAL_INVERSE_SCORE: f64 = 70.0;
pub const CRITICAL_SEVERITY: u8 = 20;
pub const HIGH_SEVERITY: u8 = 13;
pub const MEDIUM_SEVERITY: u8 = 7;

const AUTOMATIC_FACTORS_WEIGHT: f64 = 0.10;

fn dimension_weight(dimension: RiskDimension) -> f64 {
    match dimension {
        RiskDimension::Technical => 0.30,
        RiskDimension::Social => 0.25,
        RiskDimension::Financial => 0.20,
        RiskDimension::Regulatory => 0.15,
    }
}

/// Risk level of a severity on the 5x5 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Bajo,
    Medio,
    Alto,
    Critico,
}

impl RiskTier {
    pub fn from_severity(severity: u8) -> Self {
        if severity >= CRITICAL_SEVERITY {
            RiskTier::Critico
        } else if severity >= HIGH_SEVERITY {
            RiskTier::Alto
        } else if severity >= MEDIUM_SEVERITY {
            RiskTier::Medio
        } else {
            RiskTier::Bajo
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Bajo => "BAJO",
            RiskTier::Medio => "MEDIO",
            RiskTier::Alto => "ALTO",
            RiskTier::Critico => "CRÍTICO",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionRisk {
    pub dimension: RiskDimension,
    pub probability: Option<u8>,
    pub impact: Option<u8>,
    pub severity: Option<u8>,
    pub inverse_score: f64,
    pub tier: Option<RiskTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDeduction {
    pub factor: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomaticFactors {
    pub score: f64,
    pub deductions: Vec<FactorDeduction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub dimensions: Vec<DimensionRisk>,
    pub automatic: AutomaticFactors,
    pub overall_tier: RiskTier,
    pub max_severity: Option<u8>,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

/// `probability x impact`, or `None` when either side is unknown.
pub fn severity(
    dimension: RiskDimension,
    rating: RiskRating,
) -> Result<Option<u8>, CriterionError> {
    let (probability_field, impact_field) = match dimension {
        RiskDimension::Technical => ("technical_risk.probability", "technical_risk.impact"),
        RiskDimension::Social => ("social_risk.probability", "social_risk.impact"),
        RiskDimension::Financial => ("financial_risk.probability", "financial_risk.impact"),
        RiskDimension::Regulatory => ("regulatory_risk.probability", "regulatory_risk.impact"),
    };
    let probability = validate_scale(probability_field, rating.probability)?;
    let impact = validate_scale(impact_field, rating.impact)?;

    Ok(probability.zip(impact).map(|(p, i)| p * i))
}

pub fn inverse_score(severity: Option<u8>) -> f64 {
    match severity {
        Some(value) => {
            (100.0 - f64::from(value) / f64::from(MAX_SEVERITY) * 100.0).clamp(0.0, 100.0)
        }
        None => NEUTRAL_INVERSE_SCORE,
    }
}

/// Tier of the worst assessed dimension. Nothing assessed reads as MEDIO.
pub fn overall_tier<I>(severities: I) -> RiskTier
where
    I: IntoIterator<Item = Option<u8>>,
{
    severities
        .into_iter()
        .flatten()
        .max()
        .map(RiskTier::from_severity)
        .unwrap_or(RiskTier::Medio)
}

pub fn automatic_factors(
    profile: &ProjectProfile,
    table: &GeoPriorityTable,
    policy: &RiskPolicy,
) -> Result<AutomaticFactors, CriterionError> {
    if !profile.budget.is_finite() || profile.budget < 0.0 {
        return Err(CriterionError::invalid(
            "budget",
            format!("expected a non-negative amount, found {}", profile.budget),
        ));
    }

    let mut deductions = Vec::new();

    if let Some(tier) = tier_deduction(&policy.budget_tiers, profile.budget) {
        deductions.push(FactorDeduction {
            factor: format!("budget above {:.0}", tier.above),
            points: tier.deduction,
        });
    }

    if let Some(tier) = tier_deduction(&policy.duration_tiers, f64::from(profile.duration_months))
    {
        deductions.push(FactorDeduction {
            factor: format!("duration above {:.0} months", tier.above),
            points: tier.deduction,
        });
    }

    if profile.regions.len() > policy.max_regions_without_penalty {
        deductions.push(FactorDeduction {
            factor: format!("spans {} regions", profile.regions.len()),
            points: policy.multi_region_deduction,
        });
    }

    if profile.has_stakeholder(StakeholderType::IndigenousCommunities) {
        deductions.push(FactorDeduction {
            factor: "indigenous communities involved (prior consultation)".to_string(),
            points: policy.indigenous_consultation_deduction,
        });
    }

    let conflict_regions = policy
        .conflict_regions
        .iter()
        .map(|region| normalize_key(region))
        .collect::<Vec<_>>();
    let in_conflict_region = profile
        .regions
        .iter()
        .find(|region| conflict_regions.contains(&normalize_key(region)));
    if let Some(region) = in_conflict_region {
        let in_priority_zone = profile
            .municipalities
            .iter()
            .any(|municipality| is_geo_priority(table, &profile.regions, municipality));
        if !in_priority_zone {
            deductions.push(FactorDeduction {
                factor: format!("{region} outside designated priority zones"),
                points: policy.conflict_zone_deduction,
            });
        }
    }

    let deducted: f64 = deductions.iter().map(|deduction| deduction.points).sum();

    Ok(AutomaticFactors {
        score: (100.0 - deducted).max(0.0),
        deductions,
    })
}

pub fn assess(
    profile: &ProjectProfile,
    table: &GeoPriorityTable,
    policy: &RiskPolicy,
) -> Result<RiskAssessment, CriterionError> {
    let mut dimensions = Vec::with_capacity(4);
    for dimension in RiskDimension::ordered() {
        let rating = profile.risk.rating(dimension);
        let severity = severity(dimension, rating)?;
        dimensions.push(DimensionRisk {
            dimension,
            probability: rating.probability,
            impact: rating.impact,
            severity,
            inverse_score: inverse_score(severity),
            tier: severity.map(RiskTier::from_severity),
        });
    }

    let automatic = automatic_factors(profile, table, policy)?;
    let max_severity = dimensions.iter().filter_map(|risk| risk.severity).max();
    let overall_tier = overall_tier(dimensions.iter().map(|risk| risk.severity));

    let mut automatic_component = automatic.score;
    if overall_tier == RiskTier::Critico {
        let worst_inverse = dimensions
            .iter()
            .map(|risk| risk.inverse_score)
            .fold(f64::INFINITY, f64::min);
        automatic_component = automatic_component.min(worst_inverse);
    }

    let blended = dimensions
        .iter()
        .map(|risk| risk.inverse_score * dimension_weight(risk.dimension))
        .sum::<f64>()
        + automatic_component * AUTOMATIC_FACTORS_WEIGHT;

    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();
    for risk in &dimensions {
        let (Some(severity), Some(probability), Some(impact)) =
            (risk.severity, risk.probability, risk.impact)
        else {
            continue;
        };
        let label = risk.dimension.label();
        if severity >= CRITICAL_SEVERITY {
            alerts.push(format!(
                "CRITICAL {label} risk: severity {severity}/{MAX_SEVERITY} (probability {probability} x impact {impact})"
            ));
        } else if severity >= HIGH_SEVERITY {
            alerts.push(format!(
                "ALTO {label} risk: severity {severity}/{MAX_SEVERITY} (probability {probability} x impact {impact})"
            ));
        } else {
            continue;
        }
        recommendations.push(format!(
            "Prepare a mitigation plan for the {label} risk before approval"
        ));
    }

    Ok(RiskAssessment {
        score: blended.clamp(0.0, 100.0),
        dimensions,
        automatic,
        overall_tier,
        max_severity,
        alerts,
        recommendations,
    })
}

//! Stakeholder impact criterion: operational relevance, relationship improvement,
//! territorial reach and diversity of the groups engaged.

use serde::{Deserialize, Serialize};

use super::{is_geo_priority, validate_scale, CriterionError};
use crate::domain::{ProjectProfile, StakeholderType};
use crate::geo::GeoPriorityTable;

const OPERATIONAL_RELEVANCE_WEIGHT: f64 = 0.40;
const RELATIONSHIP_WEIGHT: f64 = 0.35;
const TERRITORIAL_REACH_WEIGHT: f64 = 0.15;
const DIVERSITY_WEIGHT: f64 = 0.10;

/// Score used for an ordinal or the diversity component when nothing was reported.
pub const NEUTRAL_COMPONENT_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakeholderBreakdown {
    pub operational_relevance: f64,
    pub relationship_improvement: f64,
    pub territorial_reach: f64,
    pub diversity: f64,
}

impl StakeholderBreakdown {
    pub fn weighted_total(&self) -> f64 {
        self.operational_relevance * OPERATIONAL_RELEVANCE_WEIGHT
            + self.relationship_improvement * RELATIONSHIP_WEIGHT
            + self.territorial_reach * TERRITORIAL_REACH_WEIGHT
            + self.diversity * DIVERSITY_WEIGHT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeholderAssessment {
    pub score: f64,
    pub breakdown: StakeholderBreakdown,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Maps a 1-5 level onto its fixed score; `None` is neutral.
pub fn ordinal_score(field: &'static str, level: Option<u8>) -> Result<f64, CriterionError> {
    let score = match validate_scale(field, level)? {
        Some(5) => 100.0,
        Some(4) => 85.0,
        Some(3) => 65.0,
        Some(2) => 40.0,
        Some(_) => 20.0,
        None => NEUTRAL_COMPONENT_SCORE,
    };
    Ok(score)
}

pub fn territorial_reach(
    profile: &ProjectProfile,
    table: &GeoPriorityTable,
) -> Result<f64, CriterionError> {
    let priority = profile.territorial_priority;
    if !priority.is_finite() || priority < 0.0 {
        return Err(CriterionError::invalid(
            "territorial_priority",
            format!("expected a non-negative number, found {priority}"),
        ));
    }

    let mut reach = (priority * 3.0).min(30.0);
    reach += (profile.municipalities.len() as f64 * 10.0).min(30.0);

    if profile
        .municipalities
        .iter()
        .any(|municipality| is_geo_priority(table, &profile.regions, municipality))
    {
        reach += 15.0;
    }
    if profile.regions.len() > 1 {
        reach += 15.0;
    }
    if profile.in_strategic_corridor {
        reach += 10.0;
    }

    Ok(reach.min(100.0))
}

/// Share of the 110-point maximum covered by the engaged groups; neutral when none given.
pub fn diversity(stakeholders: &[StakeholderType]) -> f64 {
    if stakeholders.is_empty() {
        return NEUTRAL_COMPONENT_SCORE;
    }

    let mut seen = Vec::with_capacity(stakeholders.len());
    let mut total = 0;
    for stakeholder in stakeholders {
        if !seen.contains(stakeholder) {
            seen.push(*stakeholder);
            total += stakeholder.weight();
        }
    }

    f64::from(total) / f64::from(StakeholderType::MAX_DIVERSITY_WEIGHT) * 100.0
}

pub fn assess(
    profile: &ProjectProfile,
    table: &GeoPriorityTable,
) -> Result<StakeholderAssessment, CriterionError> {
    let breakdown = StakeholderBreakdown {
        operational_relevance: ordinal_score(
            "operational_relevance",
            profile.operational_relevance,
        )?,
        relationship_improvement: ordinal_score(
            "relationship_improvement",
            profile.relationship_improvement,
        )?,
        territorial_reach: territorial_reach(profile, table)?,
        diversity: diversity(&profile.stakeholder_types),
    };

    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();

    if matches!(profile.operational_relevance, Some(level) if level <= 2) {
        alerts.push("Low operational relevance for the sponsoring company".to_string());
    }

    if profile.stakeholder_types.is_empty() {
        recommendations
            .push("Record the stakeholder groups engaged; diversity was assumed neutral".to_string());
    } else if breakdown.diversity < NEUTRAL_COMPONENT_SCORE {
        let missing = [
            StakeholderType::LocalAuthorities,
            StakeholderType::IndigenousCommunities,
            StakeholderType::CommunityLeaders,
        ]
        .into_iter()
        .filter(|kind| !profile.has_stakeholder(*kind))
        .map(StakeholderType::label)
        .collect::<Vec<_>>();
        recommendations.push(format!(
            "Broaden stakeholder engagement (consider {})",
            missing.join(", ")
        ));
    }

    Ok(StakeholderAssessment {
        score: breakdown.weighted_total().clamp(0.0, 100.0),
        breakdown,
        alerts,
        recommendations,
    })
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::criteria::risk::{AutomaticFactors, DimensionRisk, RiskTier};
use super::criteria::stakeholder::StakeholderBreakdown;
use crate::domain::{InvestmentSector, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    FinancialReturn,
    Stakeholder,
    ApprovalProbability,
    Risk,
}

impl CriterionKind {
    pub const fn ordered() -> [CriterionKind; 4] {
        [
            CriterionKind::FinancialReturn,
            CriterionKind::Stakeholder,
            CriterionKind::ApprovalProbability,
            CriterionKind::Risk,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            CriterionKind::FinancialReturn => "Financial return (SROI)",
            CriterionKind::Stakeholder => "Stakeholder impact",
            CriterionKind::ApprovalProbability => "Approval probability",
            CriterionKind::Risk => "Risk",
        }
    }
}

/// Discrete priority classification of a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    Rejected,
    Low,
    Medium,
    High,
    VeryHigh,
    NotEligible,
}

impl PriorityTier {
    pub const fn label(self) -> &'static str {
        match self {
            PriorityTier::Rejected => "REJECTED",
            PriorityTier::Low => "LOW",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::High => "HIGH",
            PriorityTier::VeryHigh => "VERY_HIGH",
            PriorityTier::NotEligible => "NOT_ELIGIBLE",
        }
    }
}

/// One criterion's sub-score and its weighted share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub kind: CriterionKind,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CriterionScore {
    pub(crate) fn new(kind: CriterionKind, score: f64, weight: f64) -> Self {
        Self {
            kind,
            score,
            weight,
            contribution: score * weight,
            error: None,
        }
    }

    pub(crate) fn failed(kind: CriterionKind, weight: f64, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(kind, 0.0, weight)
        }
    }
}

/// Display-only details gathered while scoring. Never written back into the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationAnnotations {
    pub financial_return_ratio: Option<f64>,
    pub financial_return_assumed: bool,
    pub sector_priorities: BTreeMap<InvestmentSector, u8>,
    pub max_sector_priority: Option<u8>,
    pub matched_municipalities: Vec<String>,
    pub stakeholder: Option<StakeholderBreakdown>,
    pub risk_dimensions: Vec<DimensionRisk>,
    pub automatic_risk_factors: Option<AutomaticFactors>,
    pub risk_tier: Option<RiskTier>,
}

/// Auditable evaluation output. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub project_id: ProjectId,
    pub total_score: f64,
    pub criteria: Vec<CriterionScore>,
    pub tier: PriorityTier,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
    pub annotations: EvaluationAnnotations,
}

impl ScoreResult {
    pub fn criterion(&self, kind: CriterionKind) -> Option<&CriterionScore> {
        self.criteria.iter().find(|criterion| criterion.kind == kind)
    }

    pub fn sub_score(&self, kind: CriterionKind) -> f64 {
        self.criterion(kind)
            .map(|criterion| criterion.score)
            .unwrap_or(0.0)
    }

    pub fn contribution_sum(&self) -> f64 {
        self.criteria
            .iter()
            .map(|criterion| criterion.contribution)
            .sum()
    }
}

//! Multi-criteria scoring engine.
//!
//! [`ScoringEngine::evaluate`] gates on eligibility, runs the four criteria, weights
//! them (40/25/20/15 by default) into a 0-100 total, derives the priority tier and
//! collects alerts and recommendations. A criterion that rejects its input is zeroed
//! on its own; the rest of the evaluation carries on.

pub mod config;
pub mod criteria;
pub mod policy;
pub mod report;
pub mod result;

#[cfg(test)]
mod tests;

pub use config::{DeductionTier, RiskPolicy, ScoringConfig, ScoringConfigError, ScoringWeights};
pub use criteria::risk::RiskTier;
pub use criteria::CriterionError;
pub use report::generate_report;
pub use result::{CriterionKind, CriterionScore, EvaluationAnnotations, PriorityTier, ScoreResult};

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{Project, ProjectProfile};
use crate::geo::GeoPriorityTable;
use criteria::{approval, financial, risk, stakeholder};

/// Stateless evaluator holding the geo table and weights it was built with.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: Arc<GeoPriorityTable>,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(
        table: Arc<GeoPriorityTable>,
        config: ScoringConfig,
    ) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn with_default_config(table: Arc<GeoPriorityTable>) -> Self {
        Self {
            table,
            config: ScoringConfig::default(),
        }
    }

    pub fn table(&self) -> &GeoPriorityTable {
        &self.table
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn evaluate(&self, project: &Project) -> ScoreResult {
        let profile = ProjectProfile::from_project(project);

        if !profile.eligible {
            info!(project = %profile.id, "project outside priority geography; skipping criteria");
            return self.ineligible(&profile);
        }

        let result = self.score(&profile);
        debug!(
            project = %result.project_id,
            total = result.total_score,
            tier = result.tier.label(),
            alerts = result.alerts.len(),
            "project scored"
        );
        result
    }

    /// Scores each project in input order.
    pub fn evaluate_batch(&self, projects: &[Project]) -> Vec<ScoreResult> {
        projects
            .iter()
            .map(|project| self.evaluate(project))
            .collect()
    }

    fn ineligible(&self, profile: &ProjectProfile) -> ScoreResult {
        let weights = &self.config.weights;
        ScoreResult {
            project_id: profile.id.clone(),
            total_score: 0.0,
            criteria: CriterionKind::ordered()
                .into_iter()
                .map(|kind| CriterionScore::new(kind, 0.0, weights.weight(kind)))
                .collect(),
            tier: PriorityTier::NotEligible,
            alerts: vec![policy::NOT_ELIGIBLE_ALERT.to_string()],
            recommendations: Vec::new(),
            annotations: EvaluationAnnotations::default(),
        }
    }

    fn score(&self, profile: &ProjectProfile) -> ScoreResult {
        let weights = &self.config.weights;
        let mut criteria = Vec::with_capacity(4);
        let mut criterion_alerts = Vec::new();
        let mut recommendations = Vec::new();
        let mut annotations = EvaluationAnnotations::default();

        match financial::assess(profile) {
            Ok(assessment) => {
                criteria.push(CriterionScore::new(
                    CriterionKind::FinancialReturn,
                    assessment.score,
                    weights.financial_return,
                ));
                annotations.financial_return_ratio = Some(assessment.ratio);
                annotations.financial_return_assumed = assessment.assumed;
                criterion_alerts.extend(assessment.alerts);
                recommendations.extend(assessment.recommendations);
            }
            Err(error) => criteria.push(self.recover(
                profile,
                CriterionKind::FinancialReturn,
                error,
                &mut criterion_alerts,
            )),
        }

        match stakeholder::assess(profile, &self.table) {
            Ok(assessment) => {
                criteria.push(CriterionScore::new(
                    CriterionKind::Stakeholder,
                    assessment.score,
                    weights.stakeholder,
                ));
                annotations.stakeholder = Some(assessment.breakdown);
                criterion_alerts.extend(assessment.alerts);
                recommendations.extend(assessment.recommendations);
            }
            Err(error) => criteria.push(self.recover(
                profile,
                CriterionKind::Stakeholder,
                error,
                &mut criterion_alerts,
            )),
        }

        let approval = approval::assess(profile, &self.table);
        criteria.push(CriterionScore::new(
            CriterionKind::ApprovalProbability,
            approval.score,
            weights.approval_probability,
        ));
        annotations.matched_municipalities = approval.matched_municipalities();
        annotations.sector_priorities = approval.sector_priorities;
        annotations.max_sector_priority = approval.max_priority;
        criterion_alerts.extend(approval.alerts);
        recommendations.extend(approval.recommendations);

        match risk::assess(profile, &self.table, &self.config.risk) {
            Ok(assessment) => {
                criteria.push(CriterionScore::new(
                    CriterionKind::Risk,
                    assessment.score,
                    weights.risk,
                ));
                annotations.risk_tier = Some(assessment.overall_tier);
                annotations.risk_dimensions = assessment.dimensions;
                annotations.automatic_risk_factors = Some(assessment.automatic);
                criterion_alerts.extend(assessment.alerts);
                recommendations.extend(assessment.recommendations);
            }
            Err(error) => criteria.push(self.recover(
                profile,
                CriterionKind::Risk,
                error,
                &mut criterion_alerts,
            )),
        }

        let total_score = criteria
            .iter()
            .map(|criterion| criterion.contribution)
            .sum::<f64>()
            .clamp(0.0, 100.0);

        let financial_score = criteria
            .iter()
            .find(|criterion| criterion.kind == CriterionKind::FinancialReturn)
            .map(|criterion| criterion.score)
            .unwrap_or(0.0);
        let decision = policy::decide_tier(financial_score, total_score, annotations.risk_tier);

        let mut alerts = Vec::with_capacity(criterion_alerts.len() + 2);
        if decision.tier == PriorityTier::Rejected {
            alerts.push(policy::REJECTION_BANNER.to_string());
        }
        alerts.extend(criterion_alerts);
        if decision.capped_by_risk {
            alerts.push(policy::risk_cap_alert(policy::tier_for_score(total_score)));
        }
        recommendations.extend(policy::summary_recommendation(total_score));

        ScoreResult {
            project_id: profile.id.clone(),
            total_score,
            criteria,
            tier: decision.tier,
            alerts,
            recommendations,
            annotations,
        }
    }

    fn recover(
        &self,
        profile: &ProjectProfile,
        kind: CriterionKind,
        error: CriterionError,
        alerts: &mut Vec<String>,
    ) -> CriterionScore {
        warn!(project = %profile.id, criterion = ?kind, %error, "criterion failed; scoring it as 0");
        alerts.push(format!(
            "{} could not be evaluated ({error}); scored as 0",
            kind.label()
        ));
        CriterionScore::failed(kind, self.config.weights.weight(kind), error.to_string())
    }
}

/// Orders results by total score (highest first), then by project id.
pub fn rank(mut results: Vec<ScoreResult>) -> Vec<ScoreResult> {
    results.sort_by(by_priority);
    results
}

/// Comparator behind [`rank`].
pub fn by_priority(left: &ScoreResult, right: &ScoreResult) -> Ordering {
    right
        .total_score
        .partial_cmp(&left.total_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| left.project_id.cmp(&right.project_id))
}

use serde::{Deserialize, Serialize};

use super::result::CriterionKind;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Fixed contribution of each criterion to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub financial_return: f64,
    pub stakeholder: f64,
    pub approval_probability: f64,
    pub risk: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            financial_return: 0.40,
            stakeholder: 0.25,
            approval_probability: 0.20,
            risk: 0.15,
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, kind: CriterionKind) -> f64 {
        match kind {
            CriterionKind::FinancialReturn => self.financial_return,
            CriterionKind::Stakeholder => self.stakeholder,
            CriterionKind::ApprovalProbability => self.approval_probability,
            CriterionKind::Risk => self.risk,
        }
    }

    pub fn total(&self) -> f64 {
        self.financial_return + self.stakeholder + self.approval_probability + self.risk
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        for kind in CriterionKind::ordered() {
            let weight = self.weight(kind);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { kind, weight });
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringConfigError::WeightsDoNotSumToOne { total });
        }

        Ok(())
    }
}

/// Deduction applied when a value exceeds `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionTier {
    pub above: f64,
    pub deduction: f64,
}

impl DeductionTier {
    pub const fn new(above: f64, deduction: f64) -> Self {
        Self { above, deduction }
    }
}

/// Largest deduction among the tiers the value exceeds; tiers do not stack.
pub(crate) fn tier_deduction(tiers: &[DeductionTier], value: f64) -> Option<DeductionTier> {
    tiers
        .iter()
        .filter(|tier| value > tier.above)
        .copied()
        .max_by(|left, right| left.deduction.total_cmp(&right.deduction))
}

/// Dials for the contextual ("automatic") risk factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    pub budget_tiers: Vec<DeductionTier>,
    pub duration_tiers: Vec<DeductionTier>,
    pub max_regions_without_penalty: usize,
    pub multi_region_deduction: f64,
    pub indigenous_consultation_deduction: f64,
    pub conflict_regions: Vec<String>,
    pub conflict_zone_deduction: f64,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            budget_tiers: vec![
                DeductionTier::new(10_000_000_000.0, 20.0),
                DeductionTier::new(5_000_000_000.0, 10.0),
            ],
            duration_tiers: vec![DeductionTier::new(36.0, 20.0), DeductionTier::new(24.0, 10.0)],
            max_regions_without_penalty: 2,
            multi_region_deduction: 15.0,
            indigenous_consultation_deduction: 10.0,
            conflict_regions: [
                "Arauca",
                "Caquetá",
                "Cauca",
                "Chocó",
                "Guaviare",
                "Nariño",
                "Norte de Santander",
                "Putumayo",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            conflict_zone_deduction: 15.0,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub risk: RiskPolicy,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        self.weights.validate()?;

        let tiers = self.risk.budget_tiers.iter().chain(&self.risk.duration_tiers);
        for tier in tiers {
            if !tier.above.is_finite() || !tier.deduction.is_finite() || tier.deduction < 0.0 {
                return Err(ScoringConfigError::InvalidDeductionTier(*tier));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("criterion weights must sum to 1.0 (found {total:.4})")]
    WeightsDoNotSumToOne { total: f64 },
    #[error("weight for {kind:?} must be a finite, non-negative number (found {weight})")]
    InvalidWeight { kind: CriterionKind, weight: f64 },
    #[error("risk deduction tier {0:?} must use finite values and a non-negative deduction")]
    InvalidDeductionTier(DeductionTier),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert!(weights.validate().is_ok());
        assert!((weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_weights_that_do_not_sum_to_one() {
        let weights = ScoringWeights {
            risk: 0.25,
            ..ScoringWeights::default()
        };
        match weights.validate() {
            Err(ScoringConfigError::WeightsDoNotSumToOne { total }) => {
                assert!((total - 1.10).abs() < 1e-9)
            }
            other => panic!("expected weight sum error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_weights() {
        let weights = ScoringWeights {
            financial_return: 0.70,
            risk: -0.15,
            ..ScoringWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ScoringConfigError::InvalidWeight {
                kind: CriterionKind::Risk,
                ..
            })
        ));
    }

    #[test]
    fn tier_deduction_picks_the_steepest_exceeded_tier() {
        let tiers = RiskPolicy::default().budget_tiers;
        assert_eq!(tier_deduction(&tiers, 1_000_000_000.0), None);
        assert_eq!(
            tier_deduction(&tiers, 6_000_000_000.0).map(|tier| tier.deduction),
            Some(10.0)
        );
        assert_eq!(
            tier_deduction(&tiers, 12_000_000_000.0).map(|tier| tier.deduction),
            Some(20.0)
        );
        assert_eq!(tier_deduction(&tiers, 10_000_000_000.0).map(|tier| tier.deduction), Some(10.0));
    }

    #[test]
    fn config_rejects_non_finite_tiers() {
        let mut config = ScoringConfig::default();
        config
            .risk
            .duration_tiers
            .push(DeductionTier::new(f64::NAN, 5.0));
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::InvalidDeductionTier(_))
        ));
    }
}

use super::criteria::risk::RiskTier;
use super::result::PriorityTier;

pub const VERY_HIGH_THRESHOLD: f64 = 85.0;
pub const HIGH_THRESHOLD: f64 = 70.0;
pub const MEDIUM_THRESHOLD: f64 = 50.0;
pub const HIGH_PRIORITY_RECOMMENDATION_THRESHOLD: f64 = 80.0;
pub const LOW_PRIORITY_RECOMMENDATION_THRESHOLD: f64 = 50.0;

pub(crate) const REJECTION_BANNER: &str =
    "PROJECT REJECTED: financial return score is 0; the project cannot be prioritized";
pub(crate) const NOT_ELIGIBLE_ALERT: &str =
    "PROJECT NOT ELIGIBLE: not located in a priority geography; no criteria were evaluated";

/// Tier from the total alone.
pub fn tier_for_score(total: f64) -> PriorityTier {
    if total >= VERY_HIGH_THRESHOLD {
        PriorityTier::VeryHigh
    } else if total >= HIGH_THRESHOLD {
        PriorityTier::High
    } else if total >= MEDIUM_THRESHOLD {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}

pub(crate) struct TierDecision {
    pub tier: PriorityTier,
    pub capped_by_risk: bool,
}

/// A zero financial score rejects outright; a critical risk profile caps the tier at MEDIUM.
pub(crate) fn decide_tier(
    financial_score: f64,
    total: f64,
    risk_tier: Option<RiskTier>,
) -> TierDecision {
    if financial_score == 0.0 {
        return TierDecision {
            tier: PriorityTier::Rejected,
            capped_by_risk: false,
        };
    }

    let tier = tier_for_score(total);
    if risk_tier == Some(RiskTier::Critico) && matches!(tier, PriorityTier::High | PriorityTier::VeryHigh)
    {
        return TierDecision {
            tier: PriorityTier::Medium,
            capped_by_risk: true,
        };
    }

    TierDecision {
        tier,
        capped_by_risk: false,
    }
}

pub(crate) fn risk_cap_alert(uncapped: PriorityTier) -> String {
    format!(
        "Priority capped at MEDIUM (score alone would rank {}): at least one risk dimension is CRÍTICO",
        uncapped.label()
    )
}

pub(crate) fn summary_recommendation(total: f64) -> Option<String> {
    if total >= HIGH_PRIORITY_RECOMMENDATION_THRESHOLD {
        Some(format!(
            "High priority: total score {total:.1} supports fast-tracking the project"
        ))
    } else if total < LOW_PRIORITY_RECOMMENDATION_THRESHOLD {
        Some(format!(
            "Low priority: total score {total:.1}; strengthen the weakest criteria before resubmitting"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds() {
        assert_eq!(tier_for_score(100.0), PriorityTier::VeryHigh);
        assert_eq!(tier_for_score(85.0), PriorityTier::VeryHigh);
        assert_eq!(tier_for_score(84.99), PriorityTier::High);
        assert_eq!(tier_for_score(70.0), PriorityTier::High);
        assert_eq!(tier_for_score(69.99), PriorityTier::Medium);
        assert_eq!(tier_for_score(50.0), PriorityTier::Medium);
        assert_eq!(tier_for_score(49.99), PriorityTier::Low);
        assert_eq!(tier_for_score(0.0), PriorityTier::Low);
    }

    #[test]
    fn zero_financial_score_rejects_regardless_of_total() {
        let decision = decide_tier(0.0, 99.0, Some(RiskTier::Bajo));
        assert_eq!(decision.tier, PriorityTier::Rejected);
        assert!(!decision.capped_by_risk);
    }

    #[test]
    fn critical_risk_caps_tier() {
        let decision = decide_tier(95.0, 90.0, Some(RiskTier::Critico));
        assert_eq!(decision.tier, PriorityTier::Medium);
        assert!(decision.capped_by_risk);

        let low = decide_tier(60.0, 40.0, Some(RiskTier::Critico));
        assert_eq!(low.tier, PriorityTier::Low);
        assert!(!low.capped_by_risk);

        let alto = decide_tier(95.0, 90.0, Some(RiskTier::Alto));
        assert_eq!(alto.tier, PriorityTier::VeryHigh);
    }

    #[test]
    fn summary_recommendation_thresholds() {
        assert!(summary_recommendation(80.0)
            .expect("high")
            .starts_with("High priority"));
        assert!(summary_recommendation(79.9).is_none());
        assert!(summary_recommendation(50.0).is_none());
        assert!(summary_recommendation(49.9)
            .expect("low")
            .starts_with("Low priority"));
    }
}

use std::fmt;

use super::result::{CriterionKind, ScoreResult};

/// Plain-text rendering of a [`ScoreResult`] for reviewers.
pub fn generate_report(result: &ScoreResult) -> String {
    ScoreReport(result).to_string()
}

struct ScoreReport<'a>(&'a ScoreResult);

impl fmt::Display for ScoreReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "Project {}", result.project_id)?;
        writeln!(
            f,
            "Total score: {:.2} / 100 ({})",
            result.total_score,
            result.tier.label()
        )?;

        writeln!(f, "\nCriteria")?;
        for kind in CriterionKind::ordered() {
            let Some(criterion) = result.criterion(kind) else {
                continue;
            };
            write!(
                f,
                "- {:<24} {:>6.2} x {:.2} = {:>6.2}",
                kind.label(),
                criterion.score,
                criterion.weight,
                criterion.contribution
            )?;
            if let Some(error) = &criterion.error {
                write!(f, "  [not evaluated: {error}]")?;
            }
            writeln!(f)?;
        }

        let annotations = &result.annotations;
        if let Some(ratio) = annotations.financial_return_ratio {
            let assumed = if annotations.financial_return_assumed {
                " (assumed)"
            } else {
                ""
            };
            writeln!(f, "\nSROI: {ratio:.2}{assumed}")?;
        }
        if let Some(tier) = annotations.risk_tier {
            writeln!(f, "Risk level: {tier}")?;
        }
        match annotations.max_sector_priority {
            Some(priority) => {
                writeln!(f, "Max sector priority: {priority}/10")?;
                writeln!(
                    f,
                    "Matched municipalities: {}",
                    annotations.matched_municipalities.join(", ")
                )?;
                for (sector, priority) in &annotations.sector_priorities {
                    writeln!(f, "  - {sector}: {priority}")?;
                }
            }
            None => writeln!(f, "Max sector priority: none")?,
        }

        write_section(f, "Alerts", &result.alerts)?;
        write_section(f, "Recommendations", &result.recommendations)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "\n{title}")?;
    if items.is_empty() {
        return writeln!(f, "- none");
    }
    for item in items {
        writeln!(f, "- {item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InvestmentSector, ProjectId};
    use crate::scoring::result::{CriterionScore, EvaluationAnnotations, PriorityTier};
    use crate::scoring::RiskTier;

    fn result() -> ScoreResult {
        let mut annotations = EvaluationAnnotations {
            financial_return_ratio: Some(3.5),
            max_sector_priority: Some(10),
            matched_municipalities: vec!["Magüí".to_string()],
            risk_tier: Some(RiskTier::Bajo),
            ..EvaluationAnnotations::default()
        };
        annotations
            .sector_priorities
            .insert(InvestmentSector::WaterAndSanitation, 10);

        ScoreResult {
            project_id: ProjectId("PRJ-A".to_string()),
            total_score: 94.5,
            criteria: vec![
                CriterionScore::new(CriterionKind::FinancialReturn, 95.0, 0.40),
                CriterionScore::new(CriterionKind::Stakeholder, 90.0, 0.25),
                CriterionScore::new(CriterionKind::ApprovalProbability, 100.0, 0.20),
                CriterionScore::failed(CriterionKind::Risk, 0.15, "bad input".to_string()),
            ],
            tier: PriorityTier::VeryHigh,
            alerts: Vec::new(),
            recommendations: vec!["High priority".to_string()],
            annotations,
        }
    }

    #[test]
    fn report_lists_every_section() {
        let report = generate_report(&result());

        assert!(report.starts_with("Project PRJ-A\n"));
        assert!(report.contains("Total score: 94.50 / 100 (VERY_HIGH)"));
        assert!(report.contains("Financial return (SROI)"));
        assert!(report.contains("[not evaluated: bad input]"));
        assert!(report.contains("Risk level: BAJO"));
        assert!(report.contains("Max sector priority: 10/10"));
        assert!(report.contains("  - water and sanitation: 10"));
        assert!(report.contains("Alerts\n- none"));
        assert!(report.contains("Recommendations\n- High priority"));
    }
}

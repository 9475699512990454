use crate::infra::{default_engine, load_geo_table, weighted_engine, InMemoryProjectRepository};
use chrono::SecondsFormat;
use clap::Args;
use prioritizer::config::{AppConfig, GeoPriorityConfig};
use prioritizer::domain::{InvestmentSector, Project, RiskInputs, RiskRating, StakeholderType};
use prioritizer::error::AppError;
use prioritizer::projects::PrioritizationService;
use prioritizer::scoring::{generate_report, rank, ScoreResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding one project or an array of projects
    #[arg(long)]
    pub(crate) project: PathBuf,
    /// Print the score results as JSON instead of text reports
    #[arg(long)]
    pub(crate) json: bool,
    /// Order the output by total score instead of input order
    #[arg(long)]
    pub(crate) rank: bool,
    /// Geo-priority CSV to load instead of APP_GEO_PRIORITY_CSV
    #[arg(long)]
    pub(crate) geo_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Geo-priority CSV to load instead of the bundled sample
    #[arg(long)]
    pub(crate) geo_csv: Option<PathBuf>,
    /// Print only the ranked summary, without per-project reports
    #[arg(long)]
    pub(crate) summary_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectInput {
    Many(Vec<Project>),
    One(Box<Project>),
}

pub(crate) fn parse_projects(raw: &str) -> Result<Vec<Project>, AppError> {
    let projects = match serde_json::from_str::<ProjectInput>(raw)? {
        ProjectInput::Many(projects) => projects,
        ProjectInput::One(project) => vec![*project],
    };
    Ok(projects)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        project,
        json,
        rank: ranked,
        geo_csv,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(path) = geo_csv {
        config.geo_priority.csv_path = Some(path);
    }
    let engine = weighted_engine(load_geo_table(&config.geo_priority)?, config.weights)?;

    let raw = std::fs::read_to_string(&project)?;
    let projects = parse_projects(&raw)?;
    let mut results = engine.evaluate_batch(&projects);
    if ranked {
        results = rank(results);
    }

    print_results(&results, json)
}

fn print_results(results: &[ScoreResult], json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", render_json(results)?);
        return Ok(());
    }

    for (index, result) in results.iter().enumerate() {
        if index > 0 {
            println!("{}", "-".repeat(60));
        }
        print!("{}", generate_report(result));
    }
    Ok(())
}

fn render_json(results: &[ScoreResult]) -> Result<String, AppError> {
    serde_json::to_string_pretty(results).map_err(AppError::Output)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        geo_csv,
        summary_only,
    } = args;

    let table = load_geo_table(&GeoPriorityConfig { csv_path: geo_csv })?;
    println!(
        "Project prioritization demo ({} geo-priority municipalities loaded)",
        table.len()
    );

    let repository = Arc::new(InMemoryProjectRepository::default());
    let service = PrioritizationService::new(default_engine(table), repository);

    for project in demo_projects() {
        let record = match service.evaluate(project) {
            Ok(record) => record,
            Err(err) => {
                println!("  Evaluation unavailable: {}", err);
                continue;
            }
        };
        if !summary_only {
            println!(
                "\n== {} (evaluated {})",
                record.project.name,
                record
                    .evaluated_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            );
            print!("{}", generate_report(&record.result));
        }
    }

    println!("\nRanking");
    let ranked = match service.ranked(None) {
        Ok(ranked) => ranked,
        Err(err) => {
            println!("  Ranking unavailable: {}", err);
            return Ok(());
        }
    };
    for (position, record) in ranked.iter().enumerate() {
        let summary = record.summary();
        println!(
            "{:>2}. {:<10} {:>6.2}  {:<12} {} ({} alerts)",
            position + 1,
            summary.project_id,
            summary.total_score,
            summary.tier.label(),
            summary.name,
            summary.alerts
        );
    }

    Ok(())
}

pub(crate) fn demo_projects() -> Vec<Project> {
    let mut water = Project::new("PRJ-001");
    water.name = "Acueducto rural Magüí".to_string();
    water.financial_return_ratio = Some(4.8);
    water.operational_relevance = Some(5);
    water.relationship_improvement = Some(5);
    water.territorial_priority = Some(9.0);
    water.in_strategic_corridor = true;
    water.stakeholder_types = vec![
        StakeholderType::LocalAuthorities,
        StakeholderType::CommunityLeaders,
        StakeholderType::IndigenousCommunities,
    ];
    water.regions = vec!["Nariño".to_string()];
    water.municipalities = vec!["Magüí".to_string()];
    water.sectors = vec![InvestmentSector::WaterAndSanitation];
    water.risk = RiskInputs::uniform(1, 2);
    water.duration_months = 18;
    water.budget = 2_400_000_000.0;

    let mut roads = Project::new("PRJ-002");
    roads.name = "Placa huella Tibú".to_string();
    roads.financial_return_ratio = Some(2.3);
    roads.operational_relevance = Some(4);
    roads.relationship_improvement = Some(3);
    roads.stakeholder_types = vec![
        StakeholderType::LocalAuthorities,
        StakeholderType::PrivateSector,
    ];
    roads.regions = vec!["Norte de Santander".to_string()];
    roads.municipalities = vec!["Tibú".to_string()];
    roads.sectors = vec![InvestmentSector::RoadInfrastructure];
    roads.risk = RiskInputs {
        technical: RiskRating::new(3, 3),
        social: RiskRating::new(4, 4),
        financial: RiskRating::new(2, 3),
        regulatory: RiskRating::new(2, 2),
    };
    roads.duration_months = 30;
    roads.budget = 6_500_000_000.0;

    let mut school = Project::new("PRJ-003");
    school.name = "Dotación escolar Villavicencio".to_string();
    school.financial_return_ratio = Some(3.5);
    school.regions = vec!["Meta".to_string()];
    school.municipalities = vec!["Villavicencio".to_string()];
    school.sectors = vec![InvestmentSector::Education];
    school.duration_months = 10;
    school.budget = 350_000_000.0;

    let mut clinic = Project::new("PRJ-004");
    clinic.name = "Centro de salud Riosucio".to_string();
    clinic.financial_return_ratio = Some(0.7);
    clinic.operational_relevance = Some(2);
    clinic.regions = vec!["Chocó".to_string()];
    clinic.municipalities = vec!["Riosucio".to_string()];
    clinic.sectors = vec![InvestmentSector::Health];
    clinic.risk = RiskInputs::uniform(5, 5);
    clinic.duration_months = 40;
    clinic.budget = 11_000_000_000.0;

    vec![water, roads, school, clinic]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prioritizer::scoring::PriorityTier;

    #[test]
    fn parses_single_project_or_list() {
        let single = parse_projects(r#"{"id":"p-1","financial_return_ratio":2.0}"#)
            .expect("single project");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].financial_return_ratio, Some(2.0));

        let many = parse_projects(r#"[{"id":"p-1"},{"id":"p-2","eligible":false}]"#)
            .expect("project list");
        assert_eq!(many.len(), 2);
        assert!(!many[1].eligible);
    }

    #[test]
    fn malformed_payload_is_invalid_project() {
        match parse_projects(r#"{"name":"missing id"}"#) {
            Err(AppError::InvalidProject(_)) => {}
            other => panic!("expected invalid project, got {other:?}"),
        }
    }

    #[test]
    fn json_output_lists_results_in_order() {
        let table = load_geo_table(&GeoPriorityConfig::default()).expect("sample loads");
        let results = default_engine(table).evaluate_batch(&demo_projects());

        let rendered = render_json(&results).expect("results serialize");
        let payload: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        let ids = payload
            .as_array()
            .expect("array of results")
            .iter()
            .map(|result| result["project_id"].as_str().unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["PRJ-001", "PRJ-002", "PRJ-003", "PRJ-004"]);
    }

    #[test]
    fn demo_projects_cover_every_outcome() {
        let table = load_geo_table(&GeoPriorityConfig::default()).expect("sample loads");
        let engine = default_engine(table);

        let tiers = engine
            .evaluate_batch(&demo_projects())
            .into_iter()
            .map(|result| result.tier)
            .collect::<Vec<_>>();

        assert_eq!(tiers[0], PriorityTier::VeryHigh);
        assert_eq!(tiers[3], PriorityTier::Rejected);
        assert!(tiers
            .iter()
            .all(|tier| *tier != PriorityTier::NotEligible));
    }
}

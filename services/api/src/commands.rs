use crate::infra::{build_portfolio, parse_level};
use clap::Args;
use risk_desk::assistant::IntentResponder;
use risk_desk::config::AppConfig;
use risk_desk::error::AppError;
use risk_desk::portfolio::{risk_distribution, PortfolioSnapshot, RiskLevel, RiskScoreCalculator};
use risk_desk::reports::write_risk_register_to_path;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ChatArgs {
    /// Question for the assistant; words are joined with spaces
    #[arg(required = true)]
    pub(crate) words: Vec<String>,
}

impl ChatArgs {
    pub(crate) fn message(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Risk levels to score (low, medium, high, critical). None yields the baseline.
    #[arg(value_parser = parse_level)]
    pub(crate) levels: Vec<RiskLevel>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Destination file for the CSV risk register
    #[arg(long, short)]
    pub(crate) output: PathBuf,
}

fn load_snapshot() -> Result<PortfolioSnapshot, AppError> {
    let config = AppConfig::load()?;
    let portfolio = build_portfolio(&config.portfolio);
    Ok(portfolio.snapshot()?)
}

pub(crate) fn run_chat(args: ChatArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot()?;
    let reply = IntentResponder::new().respond(&args.message(), &snapshot);
    println!("{reply}");
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) {
    let score = RiskScoreCalculator::score(args.levels.iter().copied());
    println!("Risk score: {}/100 ({})", score, RiskLevel::from_score(score));
}

pub(crate) fn run_overview() -> Result<(), AppError> {
    let snapshot = load_snapshot()?;
    render_overview(&snapshot);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let snapshot = load_snapshot()?;
    let rows = write_risk_register_to_path(&snapshot.projects, &args.output)?;
    println!(
        "Wrote {} risk{} to {}",
        rows,
        if rows == 1 { "" } else { "s" },
        args.output.display()
    );
    Ok(())
}

fn render_overview(snapshot: &PortfolioSnapshot) {
    let metrics = &snapshot.metrics;

    println!("Portfolio risk overview");
    println!(
        "Projects: {} ({} high risk), average score {}/100",
        metrics.total_projects, metrics.high_risk_projects, metrics.average_risk_score
    );
    println!(
        "Risks: {} total, {} critical, {} open, {} mitigated, {} accepted",
        metrics.total_risks,
        metrics.critical_risks_count,
        metrics.open_risks_count,
        metrics.mitigated_risks_count,
        metrics.accepted_risks_count
    );

    println!("\nRisk distribution");
    for entry in risk_distribution(&snapshot.projects) {
        println!("- {}: {}", entry.label, entry.count);
    }

    if snapshot.projects.is_empty() {
        println!("\nProjects: none");
        return;
    }

    println!("\nProjects");
    for project in &snapshot.projects {
        println!(
            "- {} | {} | score {}/100 ({}) | progress {}% | {} risks",
            project.name,
            project.status,
            project.risk_score,
            RiskLevel::from_score(project.risk_score),
            project.progress,
            project.risks.len()
        );
    }
}

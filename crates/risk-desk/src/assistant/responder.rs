use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::intent::{classify, Intent, MitigationArea};
use crate::portfolio::{
    MarketImpact, PortfolioSnapshot, Project, ProjectId, Risk, RiskStatus,
};

/// Opening line shown when a conversation starts.
pub const WELCOME_MESSAGE: &str = "Hello! I am your Project Risk AI Assistant. You can ask me about project risks, status updates, or market trends. How can I help you today?";

pub const GREETING_REPLY: &str = "Hello! I'm your Project Risk AI Assistant. Ask me about project status, risk summaries, market trends, mitigation strategies, budgets, or timelines.";

pub const HELP_REPLY: &str = "I can answer questions about your project portfolio using the latest project data. Try asking:\n\
- \"What's the status of the Cloud Migration project?\"\n\
- \"Give me a risk summary\"\n\
- \"What market trends could affect us?\"\n\
- \"Which risks are high or critical?\"\n\
- \"How do we mitigate the payment gateway risk?\"\n\
- \"How is the budget looking?\"\n\
- \"Are any deadlines slipping?\"";

pub const FALLBACK_REPLY: &str = "I'm not sure how to respond to that. I can help with project status, risk summaries, market trends, mitigation strategies, budgets, and timelines.";

const MITIGATION_PROMPT: &str = "Which risk area would you like mitigation advice for? For example, ask how to mitigate the security breach risk or the payment gateway risk.";

/// Classified intent together with the rendered reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub text: String,
}

/// Stateless responder formatting live portfolio data for each intent.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentResponder;

impl IntentResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn reply(&self, message: &str, snapshot: &PortfolioSnapshot) -> AssistantReply {
        let intent = classify(message, &snapshot.projects);
        debug!(intent = ?intent.kind(), "classified assistant message");
        let text = render(&intent, snapshot);
        AssistantReply { intent, text }
    }

    pub fn respond(&self, message: &str, snapshot: &PortfolioSnapshot) -> String {
        self.reply(message, snapshot).text
    }
}

fn render(intent: &Intent, snapshot: &PortfolioSnapshot) -> String {
    match intent {
        Intent::ProjectStatus { project } => project_status(lookup(snapshot, project), snapshot),
        Intent::RiskOverview => risk_overview(snapshot),
        Intent::MarketTrends => market_trends(snapshot),
        Intent::HighRisk => high_risk(snapshot),
        Intent::Mitigation { area } => mitigation(*area, snapshot),
        Intent::Budget { project } => match lookup(snapshot, project) {
            Some(project) => project_budget(project),
            None => portfolio_budget(&snapshot.projects),
        },
        Intent::Timeline { project } => match lookup(snapshot, project) {
            Some(project) => project_timeline(project),
            None => portfolio_timeline(&snapshot.projects),
        },
        Intent::Help => HELP_REPLY.to_string(),
        Intent::Greeting => GREETING_REPLY.to_string(),
        Intent::Fallback => FALLBACK_REPLY.to_string(),
    }
}

fn lookup<'a>(snapshot: &'a PortfolioSnapshot, id: &Option<ProjectId>) -> Option<&'a Project> {
    id.as_ref().and_then(|id| snapshot.project(id))
}

fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

fn project_status(project: Option<&Project>, snapshot: &PortfolioSnapshot) -> String {
    let Some(project) = project else {
        if snapshot.projects.is_empty() {
            return "Which project would you like to know about? Please specify a project name."
                .to_string();
        }
        let names: Vec<&str> = snapshot
            .projects
            .iter()
            .map(|project| project.name.as_str())
            .collect();
        return format!(
            "Which project would you like to know about? I'm currently tracking: {}.",
            names.join(", ")
        );
    };

    let risk_count = project.risks.len();
    format!(
        "Project \"{}\" is currently {} with a risk score of {}/100. Progress is at {}%, with {} identified {} ({} high or critical).",
        project.name,
        project.status.label().to_lowercase(),
        project.risk_score,
        project.progress,
        risk_count,
        plural(risk_count, "risk", "risks"),
        project.high_severity_risks()
    )
}

fn risk_overview(snapshot: &PortfolioSnapshot) -> String {
    let metrics = &snapshot.metrics;
    format!(
        "The overall risk profile shows {} high-risk {} out of {} total projects. Across all projects there are {} critical and {} open risks, with {} mitigated. The average risk score is {}/100.",
        metrics.high_risk_projects,
        plural(metrics.high_risk_projects, "project", "projects"),
        metrics.total_projects,
        metrics.critical_risks_count,
        metrics.open_risks_count,
        metrics.mitigated_risks_count,
        metrics.average_risk_score
    )
}

fn market_trends(snapshot: &PortfolioSnapshot) -> String {
    let negative: Vec<String> = snapshot
        .indicators
        .iter()
        .filter(|indicator| indicator.impact == MarketImpact::Negative)
        .map(|indicator| {
            format!(
                "{} ({}, trending {})",
                indicator.name,
                indicator.value,
                indicator.trend.label()
            )
        })
        .collect();

    if negative.is_empty() {
        return "Current market analysis shows no negative indicators affecting your projects."
            .to_string();
    }

    format!(
        "Current market analysis shows {} negative {} that could impact projects. The most concerning are: {}.",
        negative.len(),
        plural(negative.len(), "indicator", "indicators"),
        negative.join(", ")
    )
}

/// Unmitigated High/Critical risks, most severe first.
fn severe_risks(projects: &[Project]) -> Vec<(&Project, &Risk)> {
    let mut risks: Vec<(&Project, &Risk)> = projects
        .iter()
        .flat_map(|project| project.risks.iter().map(move |risk| (project, risk)))
        .filter(|(_, risk)| risk.level.is_severe() && risk.status != RiskStatus::Mitigated)
        .collect();
    risks.sort_by_key(|(_, risk)| {
        Reverse((
            risk.level,
            u16::from(risk.probability) * u16::from(risk.impact),
        ))
    });
    risks
}

fn high_risk(snapshot: &PortfolioSnapshot) -> String {
    let risks = severe_risks(&snapshot.projects);
    let Some((project, top)) = risks.first() else {
        return "There are no unmitigated high or critical risks across your projects right now."
            .to_string();
    };

    let affected: BTreeSet<&ProjectId> = risks.iter().map(|(project, _)| &project.id).collect();

    format!(
        "The most severe risk is \"{}\" ({}) in the {} project, with {}% probability and {}% impact. Current mitigation: {}. There {} {} unmitigated high or critical {} across {} {}.",
        top.name,
        top.level,
        project.name,
        top.probability,
        top.impact,
        top.mitigation,
        plural(risks.len(), "is", "are"),
        risks.len(),
        plural(risks.len(), "risk", "risks"),
        affected.len(),
        plural(affected.len(), "project", "projects")
    )
}

fn find_risk<'a>(projects: &'a [Project], keywords: &[&str]) -> Option<(&'a Project, &'a Risk)> {
    projects
        .iter()
        .flat_map(|project| project.risks.iter().map(move |risk| (project, risk)))
        .find(|(_, risk)| {
            let name = risk.name.to_lowercase();
            let category = risk.category.to_lowercase();
            keywords
                .iter()
                .any(|keyword| name.contains(keyword) || category.contains(keyword))
        })
}

fn mitigation(area: Option<MitigationArea>, snapshot: &PortfolioSnapshot) -> String {
    let (keywords, topic, playbook): (&[&str], &str, &str) = match area {
        Some(MitigationArea::Security) => (
            &["security", "breach"],
            "security breach",
            "encrypt data in transit and at rest, run a penetration test before each migration wave, restrict access with least-privilege roles, and rehearse the incident response plan",
        ),
        Some(MitigationArea::Payment) => (
            &["payment", "gateway"],
            "payment gateway",
            "validate the integration against the vendor sandbox, add idempotent retries for failed transactions, keep a fallback provider configured, and alert on rising transaction failure rates",
        ),
        None => return MITIGATION_PROMPT.to_string(),
    };

    match find_risk(&snapshot.projects, keywords) {
        Some((project, risk)) => format!(
            "To mitigate the {} risk on the {} project, {}. The current plan for \"{}\" ({}, {}) is: {}.",
            topic,
            project.name,
            playbook,
            risk.name,
            risk.level,
            risk.status.label().to_lowercase(),
            risk.mitigation.trim_end_matches('.')
        ),
        None => format!("To mitigate {} risks, {}.", topic, playbook),
    }
}

fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn project_budget(project: &Project) -> String {
    let spend_pct = project.spend_pct();
    let gap = spend_pct - f64::from(project.progress);
    let outlook = if gap >= 1.0 {
        format!(
            "Spending is running {:.0} points ahead of delivery.",
            gap
        )
    } else {
        "Spending is in line with delivery.".to_string()
    };

    format!(
        "The {} project has spent {} of its {} budget ({:.0}%) with progress at {}%. {}",
        project.name,
        format_currency(project.spent),
        format_currency(project.budget),
        spend_pct,
        project.progress,
        outlook
    )
}

fn portfolio_budget(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "There are no projects to report budget figures for yet.".to_string();
    }

    let budget: f64 = projects.iter().map(|project| project.budget).sum();
    let spent: f64 = projects.iter().map(|project| project.spent).sum();
    let pct = if budget > 0.0 { spent / budget * 100.0 } else { 0.0 };

    let ahead: Vec<String> = projects
        .iter()
        .filter(|project| project.spend_pct() - f64::from(project.progress) >= 1.0)
        .map(|project| {
            format!(
                "{} ({:.0}% spent, {}% complete)",
                project.name,
                project.spend_pct(),
                project.progress
            )
        })
        .collect();

    let outlook = if ahead.is_empty() {
        "Spending is tracking progress on every project.".to_string()
    } else {
        format!("Spending is ahead of progress on: {}.", ahead.join(", "))
    };

    format!(
        "Across {} {}, {} of the {} total budget has been spent ({:.0}%). {}",
        projects.len(),
        plural(projects.len(), "project", "projects"),
        format_currency(spent),
        format_currency(budget),
        pct,
        outlook
    )
}

fn project_timeline(project: &Project) -> String {
    let open_risks = project
        .risks
        .iter()
        .filter(|risk| risk.status == RiskStatus::Open)
        .count();
    let mut text = format!(
        "The {} project runs from {} to {} ({} days) and is currently {} with progress at {}%.",
        project.name,
        project.start_date,
        project.end_date,
        project.duration_days(),
        project.status.label().to_lowercase(),
        project.progress
    );
    if project.status.is_troubled() && open_risks > 0 {
        text.push_str(&format!(
            " {} open {} could push the {} deadline further.",
            open_risks,
            plural(open_risks, "risk", "risks"),
            project.end_date
        ));
    }
    text
}

fn portfolio_timeline(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "There are no projects with schedules to report yet.".to_string();
    }

    let troubled: Vec<String> = projects
        .iter()
        .filter(|project| project.status.is_troubled())
        .map(|project| {
            format!(
                "{} ({}, due {}, {}% complete)",
                project.name,
                project.status.label().to_lowercase(),
                project.end_date,
                project.progress
            )
        })
        .collect();

    if troubled.is_empty() {
        return format!(
            "All {} {} are on schedule.",
            projects.len(),
            plural(projects.len(), "project", "projects")
        );
    }

    format!(
        "{} of {} projects need schedule attention: {}.",
        troubled.len(),
        projects.len(),
        troubled.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::seed::{demo_indicators, demo_projects};
    use crate::portfolio::MarketIndicator;

    fn snapshot() -> PortfolioSnapshot {
        PortfolioSnapshot::new(demo_projects(), demo_indicators())
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(275_000.0), "$275,000");
        assert_eq!(format_currency(1_025_000.4), "$1,025,000");
        assert_eq!(format_currency(999.5), "$1,000");
        assert_eq!(format_currency(0.0), "$0");
    }

    #[test]
    fn project_status_reports_live_values() {
        let text = IntentResponder::new().respond(
            "What's the status of the Cloud Migration project?",
            &snapshot(),
        );
        assert_eq!(
            text,
            "Project \"Cloud Migration\" is currently at risk with a risk score of 65/100. Progress is at 45%, with 2 identified risks (1 high or critical)."
        );
    }

    #[test]
    fn unresolved_project_lists_tracked_names() {
        let text = IntentResponder::new().respond("project status please", &snapshot());
        assert_eq!(
            text,
            "Which project would you like to know about? I'm currently tracking: Cloud Migration, CRM Implementation, E-Commerce Platform."
        );
    }

    #[test]
    fn market_reply_lists_negative_indicators() {
        let text = IntentResponder::new().respond("any external trends?", &snapshot());
        assert!(text.starts_with("Current market analysis shows 4 negative indicators"));
        assert!(text.contains("Cybersecurity Threats (78, trending up)"));
        assert!(!text.contains("Cloud Services Demand"));

        let calm = PortfolioSnapshot::new(
            demo_projects(),
            vec![MarketIndicator {
                name: "Cloud Services Demand".to_string(),
                value: 82.0,
                trend: crate::portfolio::Trend::Up,
                impact: MarketImpact::Positive,
            }],
        );
        assert!(IntentResponder::new()
            .respond("market", &calm)
            .contains("no negative indicators"));
    }

    #[test]
    fn high_risk_reply_names_the_most_severe_risk() {
        let text = IntentResponder::new().respond("Which risks are critical?", &snapshot());
        assert!(text.starts_with(
            "The most severe risk is \"Payment Gateway Integration Failure\" (Critical) in the E-Commerce Platform project"
        ));
        assert!(text.contains("There are 3 unmitigated high or critical risks across 2 projects."));
    }

    #[test]
    fn mitigation_reply_quotes_the_current_plan() {
        let text = IntentResponder::new()
            .respond("How can we mitigate a security breach?", &snapshot());
        assert!(text.starts_with("To mitigate the security breach risk on the Cloud Migration project"));
        assert!(text.ends_with("is: Implement advanced encryption and security protocols."));

        let prompt = IntentResponder::new().respond("what's the solution?", &snapshot());
        assert_eq!(prompt, MITIGATION_PROMPT);
    }

    #[test]
    fn budget_reply_computes_spend_percentage() {
        let text = IntentResponder::new().respond("What is the CRM budget?", &snapshot());
        assert_eq!(
            text,
            "The CRM Implementation project has spent $150,000 of its $300,000 budget (50%) with progress at 60%. Spending is in line with delivery."
        );

        let overall = IntentResponder::new().respond("how is spending overall", &snapshot());
        assert!(overall.starts_with(
            "Across 3 projects, $1,025,000 of the $1,550,000 total budget has been spent (66%)."
        ));
        assert!(overall.contains("Cloud Migration (55% spent, 45% complete)"));
        assert!(overall.contains("E-Commerce Platform (80% spent, 70% complete)"));
        assert!(!overall.contains("CRM Implementation ("));
    }

    #[test]
    fn timeline_reply_flags_troubled_projects() {
        let text = IntentResponder::new().respond("any schedule slips?", &snapshot());
        assert_eq!(
            text,
            "2 of 3 projects need schedule attention: Cloud Migration (at risk, due 2023-12-31, 45% complete), E-Commerce Platform (delayed, due 2023-09-30, 70% complete)."
        );

        let ecommerce = IntentResponder::new().respond("e-commerce deadline", &snapshot());
        assert!(ecommerce.starts_with(
            "The E-Commerce Platform project runs from 2023-01-15 to 2023-09-30 (258 days)"
        ));
        assert!(ecommerce.ends_with("2 open risks could push the 2023-09-30 deadline further."));
    }

    #[test]
    fn empty_portfolio_replies_stay_well_formed() {
        let empty = PortfolioSnapshot::default();
        let responder = IntentResponder::new();
        assert_eq!(
            responder.respond("project status", &empty),
            "Which project would you like to know about? Please specify a project name."
        );
        assert!(responder
            .respond("risk overview", &empty)
            .contains("0 high-risk projects out of 0 total projects"));
        assert!(responder.respond("high risk", &empty).starts_with("There are no"));
        assert!(responder.respond("budget", &empty).starts_with("There are no"));
        assert!(responder.respond("timeline", &empty).starts_with("There are no"));
    }
}

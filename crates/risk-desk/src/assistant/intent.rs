use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::extract::{extract_project, mentioned_project};
use crate::portfolio::{Project, ProjectId};

/// Risk area with a dedicated mitigation playbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationArea {
    Security,
    Payment,
}

/// Parameter-free tag for each rule in the classifier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ProjectStatus,
    RiskOverview,
    MarketTrends,
    HighRisk,
    Mitigation,
    Budget,
    Timeline,
    Help,
    Greeting,
    Fallback,
}

/// Classified purpose of a chat message with any extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    ProjectStatus { project: Option<ProjectId> },
    RiskOverview,
    MarketTrends,
    HighRisk,
    Mitigation { area: Option<MitigationArea> },
    Budget { project: Option<ProjectId> },
    Timeline { project: Option<ProjectId> },
    Help,
    Greeting,
    Fallback,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::ProjectStatus { .. } => IntentKind::ProjectStatus,
            Intent::RiskOverview => IntentKind::RiskOverview,
            Intent::MarketTrends => IntentKind::MarketTrends,
            Intent::HighRisk => IntentKind::HighRisk,
            Intent::Mitigation { .. } => IntentKind::Mitigation,
            Intent::Budget { .. } => IntentKind::Budget,
            Intent::Timeline { .. } => IntentKind::Timeline,
            Intent::Help => IntentKind::Help,
            Intent::Greeting => IntentKind::Greeting,
            Intent::Fallback => IntentKind::Fallback,
        }
    }
}

/// Predicate over the lowercased message.
pub struct IntentRule {
    pub kind: IntentKind,
    matches: fn(&str) -> bool,
}

impl IntentRule {
    pub fn matches(&self, lowered: &str) -> bool {
        (self.matches)(lowered)
    }
}

/// Evaluated strictly in order; the first match wins.
pub const RULES: [IntentRule; 9] = [
    IntentRule {
        kind: IntentKind::ProjectStatus,
        matches: is_project_status,
    },
    IntentRule {
        kind: IntentKind::RiskOverview,
        matches: is_risk_overview,
    },
    IntentRule {
        kind: IntentKind::MarketTrends,
        matches: is_market_query,
    },
    IntentRule {
        kind: IntentKind::HighRisk,
        matches: is_high_risk_query,
    },
    IntentRule {
        kind: IntentKind::Mitigation,
        matches: is_mitigation_query,
    },
    IntentRule {
        kind: IntentKind::Budget,
        matches: is_budget_query,
    },
    IntentRule {
        kind: IntentKind::Timeline,
        matches: is_timeline_query,
    },
    IntentRule {
        kind: IntentKind::Help,
        matches: is_help_query,
    },
    IntentRule {
        kind: IntentKind::Greeting,
        matches: is_greeting,
    },
];

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn risk_summary_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"risk.{0,10}summary").ok())
        .as_ref()
}

fn greeting_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(?:hi|hello|hey|hiya|howdy|greetings|good (?:morning|afternoon|evening))\b.{0,10}$",
            )
            .ok()
        })
        .as_ref()
}

fn is_project_status(text: &str) -> bool {
    text.contains("project") && contains_any(text, &["status", "update"])
}

fn is_risk_overview(text: &str) -> bool {
    (text.contains("risk") && contains_any(text, &["overview", "summary"]))
        || text.contains("overall risk")
        || risk_summary_pattern().is_some_and(|pattern| pattern.is_match(text))
}

fn is_market_query(text: &str) -> bool {
    contains_any(text, &["market", "trend", "external", "economy", "indicator"])
}

fn is_high_risk_query(text: &str) -> bool {
    contains_any(text, &["high", "critical"]) && text.contains("risk")
}

fn is_mitigation_query(text: &str) -> bool {
    contains_any(text, &["mitigate", "mitigation", "fix", "resolve", "solution"])
}

fn is_budget_query(text: &str) -> bool {
    contains_any(text, &["budget", "cost", "spending"])
}

fn is_timeline_query(text: &str) -> bool {
    contains_any(text, &["timeline", "schedule", "deadline", "delay"])
}

fn is_help_query(text: &str) -> bool {
    contains_any(text, &["help", "example", "what can you do"])
}

fn is_greeting(text: &str) -> bool {
    greeting_pattern().is_some_and(|pattern| pattern.is_match(text.trim()))
}

fn mitigation_area(text: &str) -> Option<MitigationArea> {
    if contains_any(text, &["security", "breach"]) {
        Some(MitigationArea::Security)
    } else if contains_any(text, &["payment", "gateway"]) {
        Some(MitigationArea::Payment)
    } else {
        None
    }
}

/// Tag of the first rule matching the message, or `Fallback`.
pub fn match_kind(message: &str) -> IntentKind {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.kind)
        .unwrap_or(IntentKind::Fallback)
}

/// Classify a message and extract the parameters its winning rule needs.
pub fn classify(message: &str, projects: &[Project]) -> Intent {
    let lowered = message.to_lowercase();
    match match_kind(&lowered) {
        IntentKind::ProjectStatus => Intent::ProjectStatus {
            project: extract_project(&lowered, projects),
        },
        IntentKind::RiskOverview => Intent::RiskOverview,
        IntentKind::MarketTrends => Intent::MarketTrends,
        IntentKind::HighRisk => Intent::HighRisk,
        IntentKind::Mitigation => Intent::Mitigation {
            area: mitigation_area(&lowered),
        },
        IntentKind::Budget => Intent::Budget {
            project: mentioned_project(&lowered, projects),
        },
        IntentKind::Timeline => Intent::Timeline {
            project: mentioned_project(&lowered, projects),
        },
        IntentKind::Help => Intent::Help,
        IntentKind::Greeting => Intent::Greeting,
        IntentKind::Fallback => Intent::Fallback,
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for tracked projects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for risks owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskId(pub String);

impl fmt::Display for RiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordinal severity driving the scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    pub const fn weight(self) -> u32 {
        match self {
            Self::Low => 20,
            Self::Medium => 50,
            Self::High => 75,
            Self::Critical => 100,
        }
    }

    /// Band a 0-100 project score the same way the dashboard badges do.
    pub const fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::Critical
        } else if score > 50 {
            Self::High
        } else if score > 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn is_severe(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    Open,
    Mitigated,
    Accepted,
}

impl RiskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Mitigated => "Mitigated",
            Self::Accepted => "Accepted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Delayed,
    Completed,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Delayed => "Delayed",
            Self::Completed => "Completed",
        }
    }

    pub const fn is_troubled(self) -> bool {
        matches!(self, Self::AtRisk | Self::Delayed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single identified risk item. `project_id` is a back-reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: RiskId,
    pub name: String,
    pub description: String,
    pub level: RiskLevel,
    pub probability: u8,
    pub impact: u8,
    pub category: String,
    pub mitigation: String,
    pub status: RiskStatus,
    pub date_identified: NaiveDate,
    pub project_id: ProjectId,
}

/// Aggregate root owning its risk list in identification order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ProjectStatus,
    pub budget: f64,
    pub spent: f64,
    pub progress: u8,
    pub risk_score: u8,
    pub risks: Vec<Risk>,
}

impl Project {
    pub fn high_severity_risks(&self) -> usize {
        self.risks
            .iter()
            .filter(|risk| risk.level.is_severe())
            .count()
    }

    pub fn spend_pct(&self) -> f64 {
        if self.budget > 0.0 {
            self.spent / self.budget * 100.0
        } else {
            0.0
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn risk(&self, id: &RiskId) -> Option<&Risk> {
        self.risks.iter().find(|risk| &risk.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketImpact {
    Positive,
    Negative,
    Neutral,
}

/// External market signal, read-only for the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketIndicator {
    pub name: String,
    pub value: f64,
    pub trend: Trend,
    pub impact: MarketImpact,
}

/// Narrow a validated form percentage to its stored width.
pub(crate) fn percent(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Risk captured on a creation form or appended to an existing project.
///
/// Percentages are read as wide integers so out-of-range input reaches validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDraft {
    pub name: String,
    pub description: String,
    pub level: RiskLevel,
    pub category: String,
    #[serde(default = "RiskDraft::default_likelihood")]
    pub probability: i64,
    #[serde(default = "RiskDraft::default_likelihood")]
    pub impact: i64,
    #[serde(default)]
    pub mitigation: Option<String>,
    #[serde(default)]
    pub status: Option<RiskStatus>,
    #[serde(default)]
    pub date_identified: Option<NaiveDate>,
}

impl RiskDraft {
    pub const DEFAULT_MITIGATION: &'static str = "To be defined";

    const fn default_likelihood() -> i64 {
        50
    }

    pub fn new(name: &str, description: &str, level: RiskLevel, category: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            level,
            category: category.to_string(),
            probability: Self::default_likelihood(),
            impact: Self::default_likelihood(),
            mitigation: None,
            status: None,
            date_identified: None,
        }
    }

    pub(crate) fn into_risk(self, id: RiskId, project_id: ProjectId, today: NaiveDate) -> Risk {
        Risk {
            id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            level: self.level,
            probability: percent(self.probability),
            impact: percent(self.impact),
            category: self.category.trim().to_string(),
            mitigation: self
                .mitigation
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_MITIGATION.to_string()),
            status: self.status.unwrap_or(RiskStatus::Open),
            date_identified: self.date_identified.unwrap_or(today),
            project_id,
        }
    }
}

/// Submitted project creation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ProjectStatus,
    pub budget: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub risks: Vec<RiskDraft>,
}

/// Partial edit; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub spent: Option<f64>,
    #[serde(default)]
    pub progress: Option<i64>,
}

impl ProjectUpdate {
    pub(crate) fn apply_to(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            project.description = description.trim().to_string();
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = end_date;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(spent) = self.spent {
            project.spent = spent;
        }
        if let Some(progress) = self.progress {
            project.progress = percent(progress);
        }
    }
}

use serde::Serialize;

use super::domain::{MarketIndicator, Project, ProjectId, RiskLevel, RiskStatus};

/// Portfolio-wide counters shown on the overview and quoted by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallRiskMetrics {
    pub average_risk_score: u8,
    pub high_risk_projects: usize,
    pub critical_risks_count: usize,
    pub open_risks_count: usize,
    pub mitigated_risks_count: usize,
    pub accepted_risks_count: usize,
    pub total_projects: usize,
    pub total_risks: usize,
}

impl OverallRiskMetrics {
    pub fn from_projects(projects: &[Project]) -> Self {
        let total_projects = projects.len();
        let score_sum: u64 = projects
            .iter()
            .map(|project| u64::from(project.risk_score))
            .sum();
        let average_risk_score = if total_projects > 0 {
            let count = total_projects as u64;
            ((2 * score_sum + count) / (2 * count)).min(100) as u8
        } else {
            0
        };

        let high_risk_projects = projects
            .iter()
            .filter(|project| RiskLevel::from_score(project.risk_score).is_severe())
            .count();

        let risks = projects.iter().flat_map(|project| project.risks.iter());
        let mut metrics = Self {
            average_risk_score,
            high_risk_projects,
            total_projects,
            ..Self::default()
        };

        for risk in risks {
            metrics.total_risks += 1;
            if risk.level == RiskLevel::Critical {
                metrics.critical_risks_count += 1;
            }
            match risk.status {
                RiskStatus::Open => metrics.open_risks_count += 1,
                RiskStatus::Mitigated => metrics.mitigated_risks_count += 1,
                RiskStatus::Accepted => metrics.accepted_risks_count += 1,
            }
        }

        metrics
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskDistributionEntry {
    pub level: RiskLevel,
    pub label: &'static str,
    pub count: usize,
}

/// Risk counts per level, ordered Low through Critical.
pub fn risk_distribution(projects: &[Project]) -> Vec<RiskDistributionEntry> {
    RiskLevel::ordered()
        .into_iter()
        .map(|level| RiskDistributionEntry {
            level,
            label: level.label(),
            count: projects
                .iter()
                .flat_map(|project| project.risks.iter())
                .filter(|risk| risk.level == level)
                .count(),
        })
        .collect()
}

/// Read model handed to the assistant and overview endpoints.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioSnapshot {
    pub projects: Vec<Project>,
    pub indicators: Vec<MarketIndicator>,
    pub metrics: OverallRiskMetrics,
}

impl PortfolioSnapshot {
    pub fn new(projects: Vec<Project>, indicators: Vec<MarketIndicator>) -> Self {
        let metrics = OverallRiskMetrics::from_projects(&projects);
        Self {
            projects,
            indicators,
            metrics,
        }
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| &project.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::seed::{demo_indicators, demo_projects};

    #[test]
    fn demo_portfolio_metrics() {
        let metrics = OverallRiskMetrics::from_projects(&demo_projects());
        assert_eq!(metrics.average_risk_score, 57);
        assert_eq!(metrics.high_risk_projects, 2);
        assert_eq!(metrics.critical_risks_count, 1);
        assert_eq!(metrics.open_risks_count, 4);
        assert_eq!(metrics.mitigated_risks_count, 1);
        assert_eq!(metrics.accepted_risks_count, 0);
        assert_eq!(metrics.total_projects, 3);
        assert_eq!(metrics.total_risks, 5);
    }

    #[test]
    fn empty_portfolio_has_zero_metrics() {
        assert_eq!(
            OverallRiskMetrics::from_projects(&[]),
            OverallRiskMetrics::default()
        );
    }

    #[test]
    fn distribution_counts_each_level() {
        let counts: Vec<usize> = risk_distribution(&demo_projects())
            .into_iter()
            .map(|entry| entry.count)
            .collect();
        assert_eq!(counts, vec![0, 2, 2, 1]);
    }

    #[test]
    fn snapshot_carries_metrics() {
        let snapshot = PortfolioSnapshot::new(demo_projects(), demo_indicators());
        assert_eq!(snapshot.metrics.total_projects, 3);
        assert_eq!(snapshot.indicators.len(), 5);
    }
}

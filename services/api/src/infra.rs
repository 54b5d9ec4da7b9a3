use metrics_exporter_prometheus::PrometheusHandle;
use risk_desk::config::PortfolioConfig;
use risk_desk::portfolio::seed::demo_indicators;
use risk_desk::portfolio::{InMemoryProjectRepository, PortfolioService, RiskLevel};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Portfolio = PortfolioService<InMemoryProjectRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store and service wired from configuration; empty when seeding is off.
pub(crate) fn build_portfolio(config: &PortfolioConfig) -> Arc<Portfolio> {
    let (repository, indicators) = if config.seed_demo_data {
        (InMemoryProjectRepository::seeded(), demo_indicators())
    } else {
        (InMemoryProjectRepository::default(), Vec::new())
    };

    Arc::new(PortfolioService::new(
        Arc::new(repository),
        indicators,
        config.score_policy,
    ))
}

pub(crate) fn parse_level(raw: &str) -> Result<RiskLevel, String> {
    RiskLevel::parse(raw).ok_or_else(|| {
        format!("unknown risk level '{raw}' (expected low, medium, high, or critical)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_desk::portfolio::ScorePolicy;

    #[test]
    fn seeding_can_be_disabled() {
        let empty = build_portfolio(&PortfolioConfig {
            score_policy: ScorePolicy::Preserve,
            seed_demo_data: false,
        });
        assert!(empty.list().expect("list").is_empty());
        assert!(empty.indicators().is_empty());

        let seeded = build_portfolio(&PortfolioConfig {
            score_policy: ScorePolicy::Recompute,
            seed_demo_data: true,
        });
        assert_eq!(seeded.list().expect("list").len(), 3);
        assert_eq!(seeded.policy(), ScorePolicy::Recompute);
    }

    #[test]
    fn level_parser_reports_unknown_values() {
        assert_eq!(parse_level("Critical"), Ok(RiskLevel::Critical));
        assert!(parse_level("severe").unwrap_err().contains("severe"));
    }
}

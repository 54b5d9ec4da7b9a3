//! Project portfolio: domain model, risk scoring, the single-writer store, and its HTTP surface.

pub mod domain;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod seed;
pub mod service;
pub mod validation;

pub use domain::{
    MarketImpact, MarketIndicator, Project, ProjectDraft, ProjectId, ProjectStatus,
    ProjectUpdate, Risk, RiskDraft, RiskId, RiskLevel, RiskStatus, Trend,
};
pub use metrics::{risk_distribution, OverallRiskMetrics, PortfolioSnapshot};
pub use repository::{InMemoryProjectRepository, ProjectRepository, RepositoryError};
pub use router::portfolio_router;
pub use scoring::RiskScoreCalculator;
pub use service::{PortfolioError, PortfolioService, ScorePolicy};
pub use validation::{FieldError, ValidationErrors};

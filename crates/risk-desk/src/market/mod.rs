//! Market-impact analysis delegated to an external text generator.

pub mod parser;
pub mod router;

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::portfolio::{MarketIndicator, Project, RiskLevel};

pub use parser::{parse_assessments, MAX_ASSESSMENTS};
pub use router::market_router;

/// Structured impact assessment pulled out of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactAssessment {
    pub factor: String,
    pub trend: String,
    pub impact: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketAnalysis {
    pub narrative: String,
    pub assessments: Vec<ImpactAssessment>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("text generation is not configured: {0}")]
    Unconfigured(String),
    #[error("text generation request failed: {0}")]
    RequestFailed(String),
}

/// Prompt-in, text-out seam for the external generation service.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generator used when no provider is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

impl TextGenerator for UnconfiguredGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unconfigured(
            "no text generation provider is available for market analysis".to_string(),
        ))
    }
}

/// Prompt listing every project and indicator, asking for JSON assessments.
pub fn build_prompt(projects: &[Project], indicators: &[MarketIndicator]) -> String {
    let mut prompt = String::from(
        "You are a project risk analyst. Assess how current market conditions affect this project portfolio.\n\nProjects:\n",
    );
    for project in projects {
        let _ = writeln!(
            prompt,
            "- {} (status: {}, risk score: {}/100, {})",
            project.name,
            project.status,
            project.risk_score,
            RiskLevel::from_score(project.risk_score)
        );
    }

    prompt.push_str("\nMarket indicators:\n");
    for indicator in indicators {
        let _ = writeln!(
            prompt,
            "- {}: {} (trend {}, {:?} impact)",
            indicator.name,
            indicator.value,
            indicator.trend.label(),
            indicator.impact
        );
    }

    let _ = write!(
        prompt,
        "\nWrite a short summary, then up to {MAX_ASSESSMENTS} JSON objects of the form \
         {{\"factor\": \"...\", \"trend\": \"...\", \"impact\": \"...\", \"recommendation\": \"...\"}}."
    );
    prompt
}

/// Runs one generation request per analysis. Failures are returned as-is.
pub struct MarketAnalyst<G> {
    generator: G,
}

impl<G> MarketAnalyst<G>
where
    G: TextGenerator,
{
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn analyze(
        &self,
        projects: &[Project],
        indicators: &[MarketIndicator],
    ) -> Result<MarketAnalysis, GenerationError> {
        let prompt = build_prompt(projects, indicators);
        let narrative = self.generator.generate(&prompt).map_err(|error| {
            warn!(%error, "market analysis generation failed");
            error
        })?;
        let assessments = parse_assessments(&narrative);
        info!(
            assessments = assessments.len(),
            "market analysis generated"
        );
        Ok(MarketAnalysis {
            narrative,
            assessments,
        })
    }
}

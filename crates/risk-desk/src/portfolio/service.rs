use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    percent, MarketIndicator, Project, ProjectDraft, ProjectId, ProjectUpdate, RiskDraft, RiskId,
};
use super::metrics::PortfolioSnapshot;
use super::repository::{ProjectRepository, RepositoryError};
use super::scoring::RiskScoreCalculator;
use super::validation::{validate_draft, validate_risk, validate_update, ValidationErrors};

/// What happens to a stored score when fields or risks change after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Keep the stored score verbatim until an explicit recompute.
    #[default]
    Preserve,
    /// Recompute from the live risk list after every mutation.
    Recompute,
}

impl ScorePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "preserve" | "keep" => Some(Self::Preserve),
            "recompute" | "refresh" => Some(Self::Recompute),
            _ => None,
        }
    }
}

static PROJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_project_id() -> ProjectId {
    let id = PROJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProjectId(format!("prj-{id:06}"))
}

fn next_risk_id(project: &Project) -> RiskId {
    let mut ordinal = project.risks.len() + 1;
    loop {
        let candidate = RiskId(format!("{}-r{ordinal}", project.id));
        if project.risk(&candidate).is_none() {
            return candidate;
        }
        ordinal += 1;
    }
}

/// Single writer over the project collection.
pub struct PortfolioService<R> {
    repository: Arc<R>,
    indicators: Vec<MarketIndicator>,
    policy: ScorePolicy,
}

impl<R> PortfolioService<R>
where
    R: ProjectRepository + 'static,
{
    pub fn new(repository: Arc<R>, indicators: Vec<MarketIndicator>, policy: ScorePolicy) -> Self {
        Self {
            repository,
            indicators,
            policy,
        }
    }

    pub fn policy(&self) -> ScorePolicy {
        self.policy
    }

    pub fn indicators(&self) -> &[MarketIndicator] {
        &self.indicators
    }

    /// Validate a creation form and store the new project with a computed score.
    pub fn create(&self, draft: ProjectDraft) -> Result<Project, PortfolioError> {
        validate_draft(&draft)?;

        let id = next_project_id();
        let today = Local::now().date_naive();
        let ProjectDraft {
            name,
            description,
            start_date,
            end_date,
            status,
            budget,
            spent,
            progress,
            risks,
        } = draft;

        let risks = risks
            .into_iter()
            .enumerate()
            .map(|(index, risk)| {
                let risk_id = RiskId(format!("{id}-r{}", index + 1));
                risk.into_risk(risk_id, id.clone(), today)
            })
            .collect::<Vec<_>>();

        let project = Project {
            id,
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            start_date,
            end_date,
            status,
            budget,
            spent,
            progress: percent(progress),
            risk_score: RiskScoreCalculator::score_risks(&risks),
            risks,
        };

        let stored = self.repository.insert(project)?;
        info!(
            project_id = %stored.id,
            risk_score = stored.risk_score,
            risks = stored.risks.len(),
            "project created"
        );
        Ok(stored)
    }

    /// Replace the provided fields, keeping risks and applying the score policy.
    pub fn edit(&self, id: &ProjectId, update: ProjectUpdate) -> Result<Project, PortfolioError> {
        validate_update(&update)?;

        let project = self.mutate(id, |project| {
            update.apply_to(project);
            Ok(())
        })?;
        info!(project_id = %project.id, policy = ?self.policy, "project edited");
        Ok(project)
    }

    pub fn add_risk(&self, id: &ProjectId, draft: RiskDraft) -> Result<Project, PortfolioError> {
        validate_risk(&draft)?;

        let today = Local::now().date_naive();
        let project = self.mutate(id, |project| {
            let risk_id = next_risk_id(project);
            project
                .risks
                .push(draft.into_risk(risk_id, project.id.clone(), today));
            Ok(())
        })?;
        info!(project_id = %project.id, risks = project.risks.len(), "risk added");
        Ok(project)
    }

    pub fn remove_risk(&self, id: &ProjectId, risk_id: &RiskId) -> Result<Project, PortfolioError> {
        let project = self.mutate(id, |project| {
            let position = project
                .risks
                .iter()
                .position(|risk| &risk.id == risk_id)
                .ok_or_else(|| PortfolioError::RiskNotFound {
                    project_id: id.clone(),
                    risk_id: risk_id.clone(),
                })?;
            project.risks.remove(position);
            Ok(())
        })?;
        info!(project_id = %project.id, risk_id = %risk_id, "risk removed");
        Ok(project)
    }

    /// Recompute the stored score from the live risk list regardless of policy.
    pub fn recompute_score(&self, id: &ProjectId) -> Result<Project, PortfolioError> {
        let project = self.mutate(id, |project| {
            project.risk_score = RiskScoreCalculator::score_risks(&project.risks);
            Ok(())
        })?;
        info!(project_id = %project.id, risk_score = project.risk_score, "score recomputed");
        Ok(project)
    }

    pub fn get(&self, id: &ProjectId) -> Result<Project, PortfolioError> {
        self.require(id)
    }

    pub fn list(&self) -> Result<Vec<Project>, PortfolioError> {
        Ok(self.repository.list()?)
    }

    pub fn snapshot(&self) -> Result<PortfolioSnapshot, PortfolioError> {
        Ok(PortfolioSnapshot::new(
            self.repository.list()?,
            self.indicators.clone(),
        ))
    }

    fn require(&self, id: &ProjectId) -> Result<Project, PortfolioError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| PortfolioError::ProjectNotFound(id.clone()))
    }

    /// Read, change and write one project under a single repository lock.
    fn mutate<F>(&self, id: &ProjectId, change: F) -> Result<Project, PortfolioError>
    where
        F: FnOnce(&mut Project) -> Result<(), PortfolioError>,
    {
        self.repository
            .modify::<_, PortfolioError>(id, |project: &mut Project| {
                change(project)?;
                self.apply_policy(project);
                Ok(())
            })?
            .ok_or_else(|| PortfolioError::ProjectNotFound(id.clone()))
    }

    fn apply_policy(&self, project: &mut Project) {
        if self.policy == ScorePolicy::Recompute {
            project.risk_score = RiskScoreCalculator::score_risks(&project.risks);
        }
    }
}

/// Error raised by the portfolio service.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("invalid project data: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    #[error("risk {risk_id} not found on project {project_id}")]
    RiskNotFound {
        project_id: ProjectId,
        risk_id: RiskId,
    },
}

use std::sync::{Arc, RwLock};

use super::domain::{Project, ProjectId};
use super::seed::demo_projects;

/// Storage abstraction so the service can be exercised in isolation.
pub trait ProjectRepository: Send + Sync {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError>;
    /// Apply `change` to a copy of the stored project under one write lock, committing it
    /// only when `change` succeeds. `Ok(None)` means no project has that id.
    fn modify<F, E>(&self, id: &ProjectId, change: F) -> Result<Option<Project>, E>
    where
        F: FnOnce(&mut Project) -> Result<(), E>,
        E: From<RepositoryError>;
    fn fetch(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    /// All projects in insertion order.
    fn list(&self) -> Result<Vec<Project>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local project collection for a single active session.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<Vec<Project>>>,
}

impl InMemoryProjectRepository {
    pub fn seeded() -> Self {
        Self::with_projects(demo_projects())
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: Arc::new(RwLock::new(projects)),
        }
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("project store lock poisoned".to_string())
}

impl ProjectRepository for InMemoryProjectRepository {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.write().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(project.clone());
        Ok(project)
    }

    fn modify<F, E>(&self, id: &ProjectId, change: F) -> Result<Option<Project>, E>
    where
        F: FnOnce(&mut Project) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.projects.write().map_err(poisoned)?;
        let Some(slot) = guard.iter_mut().find(|existing| &existing.id == id) else {
            return Ok(None);
        };
        let mut draft = slot.clone();
        change(&mut draft)?;
        *slot = draft.clone();
        Ok(Some(draft))
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let guard = self.projects.read().map_err(poisoned)?;
        Ok(guard.iter().find(|project| &project.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let guard = self.projects.read().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

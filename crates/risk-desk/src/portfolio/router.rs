use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::domain::{ProjectDraft, ProjectId, ProjectUpdate, RiskDraft, RiskId, RiskLevel};
use super::metrics::{risk_distribution, OverallRiskMetrics, RiskDistributionEntry};
use super::repository::ProjectRepository;
use super::scoring::RiskScoreCalculator;
use super::service::{PortfolioError, PortfolioService};
use crate::error::AppError;

/// Router builder exposing project, overview, and scoring endpoints.
pub fn portfolio_router<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: ProjectRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/projects",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id",
            get(get_handler::<R>).patch(edit_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/risks",
            post(add_risk_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/risks/:risk_id",
            delete(remove_risk_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/score",
            post(recompute_handler::<R>),
        )
        .route("/api/v1/risk/overview", get(overview_handler::<R>))
        .route("/api/v1/risk/score", post(score_handler))
        .route("/api/v1/market/indicators", get(indicators_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScoreEntry {
    pub id: ProjectId,
    pub name: String,
    pub risk_score: u8,
    pub band: RiskLevel,
}

#[derive(Debug, Serialize)]
pub struct RiskOverview {
    pub metrics: OverallRiskMetrics,
    pub distribution: Vec<RiskDistributionEntry>,
    pub projects: Vec<ProjectScoreEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub levels: Vec<RiskLevel>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub band: RiskLevel,
}

pub(crate) fn error_response(error: PortfolioError) -> Response {
    AppError::from(error).into_response()
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, PortfolioError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<PortfolioService<R>>>) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(StatusCode::OK, service.list())
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Json(draft): Json<ProjectDraft>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(StatusCode::CREATED, service.create(draft))
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(StatusCode::OK, service.get(&ProjectId(project_id)))
}

pub(crate) async fn edit_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(project_id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(StatusCode::OK, service.edit(&ProjectId(project_id), update))
}

pub(crate) async fn add_risk_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(project_id): Path<String>,
    Json(draft): Json<RiskDraft>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(
        StatusCode::CREATED,
        service.add_risk(&ProjectId(project_id), draft),
    )
}

pub(crate) async fn remove_risk_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path((project_id, risk_id)): Path<(String, String)>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.remove_risk(&ProjectId(project_id), &RiskId(risk_id)),
    )
}

pub(crate) async fn recompute_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    respond(
        StatusCode::OK,
        service.recompute_score(&ProjectId(project_id)),
    )
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    let overview = service.list().map(|projects| RiskOverview {
        metrics: OverallRiskMetrics::from_projects(&projects),
        distribution: risk_distribution(&projects),
        projects: projects
            .iter()
            .map(|project| ProjectScoreEntry {
                id: project.id.clone(),
                name: project.name.clone(),
                risk_score: project.risk_score,
                band: RiskLevel::from_score(project.risk_score),
            })
            .collect(),
    });
    respond(StatusCode::OK, overview)
}

pub(crate) async fn score_handler(Json(request): Json<ScoreRequest>) -> Json<ScoreResponse> {
    let score = RiskScoreCalculator::score(request.levels);
    Json(ScoreResponse {
        score,
        band: RiskLevel::from_score(score),
    })
}

pub(crate) async fn indicators_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    (StatusCode::OK, Json(service.indicators().to_vec())).into_response()
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::error;

use super::write_risk_register;
use crate::error::AppError;
use crate::portfolio::router::error_response;
use crate::portfolio::{PortfolioService, ProjectRepository};

pub fn report_router<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: ProjectRepository + 'static,
{
    Router::new()
        .route("/api/v1/reports/risk-register", get(register_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    let projects = match service.list() {
        Ok(projects) => projects,
        Err(err) => return error_response(err),
    };

    let mut buffer = Vec::new();
    if let Err(err) = write_risk_register(&projects, &mut buffer) {
        error!(%err, "risk register export failed");
        return AppError::from(err).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"risk-register.csv\"",
            ),
        ],
        buffer,
    )
        .into_response()
}

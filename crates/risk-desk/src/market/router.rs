use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::{MarketAnalyst, TextGenerator};
use crate::error::AppError;
use crate::portfolio::router::error_response;
use crate::portfolio::{PortfolioService, ProjectRepository};

pub(crate) struct MarketState<R, G> {
    service: Arc<PortfolioService<R>>,
    analyst: Arc<MarketAnalyst<G>>,
}

impl<R, G> Clone for MarketState<R, G> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            analyst: Arc::clone(&self.analyst),
        }
    }
}

/// Router builder for on-demand market analysis.
pub fn market_router<R, G>(
    service: Arc<PortfolioService<R>>,
    analyst: Arc<MarketAnalyst<G>>,
) -> Router
where
    R: ProjectRepository + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/api/v1/market/analysis", post(analysis_handler::<R, G>))
        .with_state(MarketState { service, analyst })
}

pub(crate) async fn analysis_handler<R, G>(State(state): State<MarketState<R, G>>) -> Response
where
    R: ProjectRepository + 'static,
    G: TextGenerator + 'static,
{
    let snapshot = match state.service.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return error_response(error),
    };

    match state
        .analyst
        .analyze(&snapshot.projects, &snapshot.indicators)
    {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

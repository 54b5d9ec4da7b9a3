use crate::infra::{AppState, Portfolio};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use risk_desk::assistant::{assistant_router, AssistantSettings};
use risk_desk::market::{market_router, MarketAnalyst, TextGenerator};
use risk_desk::portfolio::portfolio_router;
use risk_desk::reports::report_router;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Every API router merged with the operational endpoints.
pub(crate) fn with_risk_routes<G>(
    portfolio: Arc<Portfolio>,
    analyst: Arc<MarketAnalyst<G>>,
    assistant: AssistantSettings,
) -> Router
where
    G: TextGenerator + 'static,
{
    portfolio_router(Arc::clone(&portfolio))
        .merge(assistant_router(Arc::clone(&portfolio), assistant))
        .merge(market_router(Arc::clone(&portfolio), analyst))
        .merge(report_router(portfolio))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_portfolio;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use risk_desk::market::UnconfiguredGenerator;
    use risk_desk::portfolio::ScorePolicy;
    use risk_desk::config::PortfolioConfig;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let portfolio = build_portfolio(&PortfolioConfig {
            score_policy: ScorePolicy::Preserve,
            seed_demo_data: true,
        });
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_risk_routes(
            portfolio,
            Arc::new(MarketAnalyst::new(UnconfiguredGenerator)),
            AssistantSettings::default(),
        )
        .layer(Extension(state))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get_json(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], json!("initializing"));

        let (status, _) = get_json(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_routers_share_one_portfolio() {
        let router = app(true);
        let (status, body) = get_json(router.clone(), "/api/v1/projects").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(3));

        let (_, indicators) = get_json(router, "/api/v1/market/indicators").await;
        assert_eq!(indicators.as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, body) = get_json(app(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }
}

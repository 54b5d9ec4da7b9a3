use crate::cli::ServeArgs;
use crate::infra::{build_portfolio, AppState};
use crate::routes::with_risk_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use risk_desk::assistant::AssistantSettings;
use risk_desk::config::AppConfig;
use risk_desk::error::AppError;
use risk_desk::market::{MarketAnalyst, UnconfiguredGenerator};
use risk_desk::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portfolio = build_portfolio(&config.portfolio);
    let analyst = Arc::new(MarketAnalyst::new(UnconfiguredGenerator));
    let assistant = AssistantSettings {
        reply_delay: config.assistant.reply_delay,
    };

    let app = with_risk_routes(portfolio, analyst, assistant)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        score_policy = ?config.portfolio.score_policy,
        seeded = config.portfolio.seed_demo_data,
        "project risk desk ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::responder::{IntentResponder, WELCOME_MESSAGE};
use crate::portfolio::router::error_response;
use crate::portfolio::{PortfolioService, ProjectRepository};

/// Presentation knobs for the chat endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Pause before a reply is returned. Zero disables it.
    pub reply_delay: Duration,
}

pub(crate) struct AssistantState<R> {
    service: Arc<PortfolioService<R>>,
    responder: IntentResponder,
    settings: AssistantSettings,
}

impl<R> Clone for AssistantState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            responder: self.responder,
            settings: self.settings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    #[serde(flatten)]
    pub intent: Intent,
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub reply: &'static str,
}

/// Router builder exposing the chat assistant.
pub fn assistant_router<R>(service: Arc<PortfolioService<R>>, settings: AssistantSettings) -> Router
where
    R: ProjectRepository + 'static,
{
    let state = AssistantState {
        service,
        responder: IntentResponder::new(),
        settings,
    };

    Router::new()
        .route("/api/v1/assistant/welcome", get(welcome_handler))
        .route("/api/v1/assistant/chat", post(chat_handler::<R>))
        .with_state(state)
}

pub(crate) async fn welcome_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        reply: WELCOME_MESSAGE,
    })
}

pub(crate) async fn chat_handler<R>(
    State(state): State<AssistantState<R>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    R: ProjectRepository + 'static,
{
    let snapshot = match state.service.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return error_response(error),
    };

    let reply = state.responder.reply(&request.message, &snapshot);

    if !state.settings.reply_delay.is_zero() {
        tokio::time::sleep(state.settings.reply_delay).await;
    }

    let body = ChatResponse {
        intent: reply.intent,
        reply: reply.text,
    };
    (StatusCode::OK, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::responder::FALLBACK_REPLY;
    use crate::portfolio::seed::demo_indicators;
    use crate::portfolio::{InMemoryProjectRepository, ScorePolicy};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn build_router() -> Router {
        let service = Arc::new(PortfolioService::new(
            Arc::new(InMemoryProjectRepository::seeded()),
            demo_indicators(),
            ScorePolicy::Preserve,
        ));
        assistant_router(service, AssistantSettings::default())
    }

    async fn chat(message: Value) -> (StatusCode, Value) {
        let response = build_router()
            .oneshot(
                Request::post("/api/v1/assistant/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(message.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn chat_returns_intent_and_reply() {
        let (status, body) = chat(json!({ "message": "Give me a risk summary" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], json!("risk_overview"));
        assert!(body["reply"]
            .as_str()
            .expect("reply text")
            .contains("2 high-risk projects out of 3 total projects"));
    }

    #[tokio::test]
    async fn chat_includes_extracted_project() {
        let (_, body) = chat(json!({ "message": "project status of crm" })).await;
        assert_eq!(body["intent"], json!("project_status"));
        assert_eq!(body["project"], json!("p2"));
    }

    #[tokio::test]
    async fn missing_message_falls_back() {
        let (status, body) = chat(json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], json!("fallback"));
        assert_eq!(body["reply"], json!(FALLBACK_REPLY));
    }

    #[tokio::test]
    async fn welcome_is_served() {
        let Json(body) = welcome_handler().await;
        assert!(body.reply.starts_with("Hello! I am your Project Risk AI Assistant"));
    }
}

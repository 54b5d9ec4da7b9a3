use crate::config::ConfigError;
use crate::market::GenerationError;
use crate::portfolio::{PortfolioError, RepositoryError};
use crate::reports::ReportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Portfolio(PortfolioError),
    Generation(GenerationError),
    Report(ReportError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Portfolio(PortfolioError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Portfolio(PortfolioError::ProjectNotFound(_))
            | AppError::Portfolio(PortfolioError::RiskNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Portfolio(PortfolioError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Portfolio(PortfolioError::Repository(RepositoryError::Unavailable(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Portfolio(err) => write!(f, "portfolio error: {}", err),
            AppError::Generation(err) => write!(f, "market analysis error: {}", err),
            AppError::Report(err) => write!(f, "report error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Portfolio(err) => Some(err),
            AppError::Generation(err) => Some(err),
            AppError::Report(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Portfolio(PortfolioError::Validation(errors)) => json!({
                "error": "invalid project data",
                "fields": errors,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<PortfolioError> for AppError {
    fn from(value: PortfolioError) -> Self {
        Self::Portfolio(value)
    }
}

impl From<GenerationError> for AppError {
    fn from(value: GenerationError) -> Self {
        Self::Generation(value)
    }
}

impl From<ReportError> for AppError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{FieldError, ProjectId, ValidationErrors};

    #[test]
    fn statuses_follow_error_kind() {
        let validation = AppError::from(PortfolioError::Validation(ValidationErrors(vec![
            FieldError {
                field: "name".to_string(),
                message: "Project name must be at least 3 characters".to_string(),
            },
        ])));
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = AppError::from(PortfolioError::ProjectNotFound(ProjectId("p9".to_string())));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let conflict = AppError::from(PortfolioError::Repository(RepositoryError::Conflict));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let upstream = AppError::from(GenerationError::RequestFailed("timeout".to_string()));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

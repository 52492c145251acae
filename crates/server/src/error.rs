//! HTTP-facing errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Record not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to render PDF: {0}")]
    Render(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Render(e) if e.is_template_missing() => {
                tracing::error!(error = %e, "Base template is missing");
                "Template PDF not found".to_string()
            }
            AppError::Render(e) => {
                tracing::error!(error = %e, "PDF rendering failed");
                "Failed to render PDF".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// A downstream dependency failed. The message is passed to the caller as-is.
    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// JSON error body. Every error response carries a single `detail` string.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody(rejection) => rejection.status(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match self {
            AppError::InvalidBody(rejection) => rejection.body_text(),
            AppError::NotFound(err) => err.to_string(),
            AppError::MethodNotAllowed => "Method Not Allowed".to_string(),
            AppError::Upstream(msg) => msg,
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                "Internal server error".to_string()
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                "Configuration error".to_string()
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

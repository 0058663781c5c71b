use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration key not found: {0}")]
    ConfigKeyMissing(String),

    #[error("Configuration key '{path}' is not {expected}")]
    ConfigType { path: String, expected: &'static str },

    #[error("Failed to parse configuration {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Template references field '{field}' which is not supplied")]
    TemplateFieldMissing { field: String },

    #[error("Generation backend unreachable or failed: {0}")]
    Transport(String),

    #[error("Malformed response from generation backend: {0}")]
    MalformedResponse(String),

    #[error("Export settings are not configured")]
    ExportNotConfigured,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File access failed for {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document conversion failed: {0}")]
    Conversion(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MalformedResponse(msg) => AppError::MalformedResponse(msg),
            other => AppError::Transport(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
            }
            AppError::ConfigKeyMissing(_)
            | AppError::ConfigType { .. }
            | AppError::ConfigParse { .. } => {
                tracing::error!("Configuration error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    self.to_string(),
                )
            }
            AppError::TemplateFieldMissing { .. } => {
                tracing::error!("Template error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_FIELD_MISSING",
                    self.to_string(),
                )
            }
            AppError::Transport(msg) => {
                tracing::error!("Generation transport error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TRANSPORT_ERROR",
                    "The generation backend could not be reached".to_string(),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed generation response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The generation backend returned an unexpected response".to_string(),
                )
            }
            AppError::ExportNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "EXPORT_NOT_CONFIGURED",
                self.to_string(),
            ),
            AppError::FileAccess { .. } => {
                tracing::error!("File access error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FILE_ACCESS_ERROR",
                    "A file operation failed".to_string(),
                )
            }
            AppError::Conversion(msg) => {
                tracing::error!("Conversion error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONVERSION_ERROR",
                    "Document conversion failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

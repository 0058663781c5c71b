use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::ExportedDocuments;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub markdown: String,
    pub candidate: String,
    #[serde(default)]
    pub role: String,
    pub kind: String,
}

/// POST /api/v1/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<ExportedDocuments>, AppError> {
    let exporter = state.exporter.as_ref().ok_or(AppError::ExportNotConfigured)?;
    let documents = exporter
        .export(&req.markdown, &req.candidate, &req.role, &req.kind)
        .await?;
    Ok(Json(documents))
}

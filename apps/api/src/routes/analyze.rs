use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::analysis::pipeline::ResumeAnalysisReport;
use crate::errors::AppError;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

/// POST /api/v1/analyze
/// Multipart upload; the resume is the `file` field (.pdf or .docx).
pub async fn handle_analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysisReport>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let report = Arc::clone(&state.analyzer)
            .analyze_document(file_name, data.to_vec())
            .await?;
        return Ok(Json(report));
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// POST /api/v1/analyze/text
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Result<Json<ResumeAnalysisReport>, AppError> {
    let report = Arc::clone(&state.analyzer).analyze_text(req.text).await?;
    Ok(Json(report))
}

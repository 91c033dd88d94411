//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::generator::generate_resume;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::storage::is_safe_filename;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub download_link: String,
    pub filename: String,
}

/// POST /generate-resume
///
/// Validates the submitted form, renders it to PDF, and returns the download link
/// once the document is durably stored.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Json<GenerateResponse>, AppError> {
    let document = generate_resume(record, state.store.as_ref(), &state.generation).await?;

    Ok(Json(GenerateResponse {
        download_link: document.retrieval_reference,
        filename: document.filename,
    }))
}

/// GET /resumes/:filename
///
/// Unauthenticated, read-only download of a previously generated document.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_safe_filename(&filename) {
        return Err(AppError::NotFound(format!("Document {filename} not found")));
    }

    let bytes = state
        .store
        .fetch(&filename)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound(format!("Document {filename} not found")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

//! Axum route handlers for the Screening API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::documents::{self, DataUri};
use crate::errors::AppError;
use crate::screening::pipeline::{analyze_batch, ResumeUpload, ScoreRecord};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Literal JD text, or a `data:` URI carrying a PDF/DOCX file.
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub resumes: Option<Vec<ResumeUpload>>,
}

/// POST /analyze_resumes
///
/// Scores every resume against the job description. Per-resume failures are
/// reported inside the records; only a missing/unreadable JD or an empty
/// resume list fails the request.
pub async fn handle_analyze_resumes(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Vec<ScoreRecord>>, AppError> {
    let Json(request) = payload?;

    let jd_data = request.job_description.unwrap_or_default();
    let resumes = request.resumes.unwrap_or_default();
    if jd_data.is_empty() || resumes.is_empty() {
        return Err(AppError::Validation(
            "Missing job description or resume files".to_string(),
        ));
    }

    let jd_text = resolve_job_description(jd_data).await?;
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is empty or unreadable".to_string(),
        ));
    }

    info!(
        resumes = resumes.len(),
        backend = state.analyzer.backend(),
        "Analyzing resume batch"
    );

    let records = analyze_batch(
        &resumes,
        &jd_text,
        state.analyzer.as_ref(),
        state.config.max_resume_size_mb,
    )
    .await;

    Ok(Json(records))
}

/// Plain strings are the JD itself; `data:` URIs are decoded by MIME type.
/// An unsupported MIME type resolves to empty text.
async fn resolve_job_description(jd_data: String) -> Result<String, AppError> {
    if !jd_data.starts_with("data:") {
        return Ok(jd_data);
    }

    let uri = DataUri::parse(&jd_data).map_err(|e| {
        AppError::Validation(format!("Failed to parse job description file: {e}"))
    })?;
    let format = uri.format();
    Ok(documents::extract_text_blocking(uri.bytes, format).await)
}

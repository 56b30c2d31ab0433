//! Axum route handler for batch analysis.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::analysis::lexicon::STANDARD;
use crate::analysis::pipeline::{BatchReport, Pipeline, UploadedFile};
use crate::documents::read_as_text;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart form: one or more `resume` file parts (PDF/DOCX) and exactly one
/// `job` part (plain text). Resumes are analysed in upload order and each
/// result is appended to history.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let mut resumes = Vec::new();
    let mut job: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);

        match field_name.as_str() {
            "resume" => {
                let name = file_name.unwrap_or_else(|| format!("resume-{}", resumes.len() + 1));
                let bytes = field.bytes().await?;
                resumes.push(UploadedFile { name, bytes });
            }
            "job" => {
                if job.is_some() {
                    return Err(AppError::Validation(
                        "Only one job description may be uploaded".to_string(),
                    ));
                }
                let bytes = field.bytes().await?;
                job = Some(UploadedFile {
                    name: file_name.unwrap_or_else(|| "job description".to_string()),
                    bytes,
                });
            }
            other => debug!("Ignoring unexpected multipart field '{other}'"),
        }
    }

    let job = match job {
        Some(job) if !resumes.is_empty() => job,
        _ => {
            return Err(AppError::Validation(
                "Please upload at least one resume (PDF/DOCX) and a job description (TXT)."
                    .to_string(),
            ))
        }
    };

    let job_text = read_as_text(&job.bytes);
    let pipeline = Pipeline {
        converter: state.converter.as_ref(),
        history: &state.history,
        lexicon: &STANDARD,
    };

    Ok(Json(pipeline.run_batch(resumes, &job.name, &job_text).await))
}

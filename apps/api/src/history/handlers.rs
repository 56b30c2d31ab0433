//! Axum route handlers for the History API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::history::HistoryEntry;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/history?q=
///
/// Newest first. `q` filters on resume or job name, case-insensitively.
pub async fn handle_list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Json<Vec<HistoryEntry>> {
    Json(state.history.search(&params.q).await)
}

/// DELETE /api/v1/history
pub async fn handle_clear_history(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/history/:id/feedback
///
/// Downloads the feedback text of one past analysis.
pub async fn handle_download_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state
        .history
        .find(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("History entry {id} not found")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        feedback_file_name(&entry.resume_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        entry.download_text(),
    ))
}

/// `<resume>_feedback.txt`, with characters that would break the header
/// replaced.
fn feedback_file_name(resume_name: &str) -> String {
    let safe: String = resume_name
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() || !c.is_ascii() => '_',
            c => c,
        })
        .collect();
    format!("{safe}_feedback.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_file_name() {
        assert_eq!(feedback_file_name("jane.pdf"), "jane.pdf_feedback.txt");
        assert_eq!(feedback_file_name("a\"b/c.pdf"), "a_b_c.pdf_feedback.txt");
        assert_eq!(feedback_file_name("résumé.pdf"), "r_sum_.pdf_feedback.txt");
    }
}

//! Batch pipeline: convert → analyse → append to history, one resume at a
//! time.
//!
//! Resumes are processed strictly in upload order so the history log matches
//! it. A resume that cannot be read still produces a (degraded) result, and a
//! history write failure is reported on its item; neither stops the batch.

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::lexicon::Lexicon;
use crate::analysis::result::{analyze, AnalysisInput, AnalysisResult};
use crate::documents::{DocumentConverter, FileKind};
use crate::history::{HistoryEntry, HistoryStore};

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

/// One analysed resume plus what happened when it was saved.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    /// History id of this analysis.
    pub id: String,
    pub result: AnalysisResult,
    pub feedback: String,
    /// Set when the history append failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub job_name: String,
    pub items: Vec<BatchItem>,
}

/// Everything one batch needs, borrowed from the application state.
pub struct Pipeline<'a> {
    pub converter: &'a dyn DocumentConverter,
    pub history: &'a HistoryStore,
    pub lexicon: &'a Lexicon,
}

impl Pipeline<'_> {
    /// Analyses every resume against `job_text`, in order.
    pub async fn run_batch(
        &self,
        resumes: Vec<UploadedFile>,
        job_name: &str,
        job_text: &str,
    ) -> BatchReport {
        let mut items = Vec::with_capacity(resumes.len());
        let mut last_created: Option<DateTime<Utc>> = None;

        for resume in resumes {
            let created_at = next_timestamp(Utc::now(), last_created);
            last_created = Some(created_at);
            items.push(self.run_one(resume, job_name, job_text, created_at).await);
        }

        BatchReport {
            job_name: job_name.to_string(),
            items,
        }
    }

    async fn run_one(
        &self,
        resume: UploadedFile,
        job_name: &str,
        job_text: &str,
        created_at: DateTime<Utc>,
    ) -> BatchItem {
        let kind = FileKind::from_file_name(&resume.name);
        let (resume_text, extraction_error) =
            match self.converter.convert_to_text(resume.bytes, kind).await {
                Ok(text) => (text, None),
                Err(e) => {
                    warn!("Could not read '{}': {e}", resume.name);
                    (e.marker(), Some(e.to_string()))
                }
            };

        let mut result = analyze(
            AnalysisInput {
                resume_name: &resume.name,
                job_name,
                resume_text: &resume_text,
                job_text,
                created_at,
            },
            self.lexicon,
        );
        if let Some(error) = extraction_error {
            result = result.with_extraction_error(error);
        }

        info!(
            "Analysed '{}' against '{}': {}% ({}), experience: {}",
            result.resume_name,
            result.job_name,
            result.breakdown.final_score,
            result.match_level.label(),
            result.facts.experience_label()
        );

        let entry = HistoryEntry::from(&result);
        let feedback = entry.feedback.clone();
        let (id, history_error) = match self.history.append(entry.clone()).await {
            Ok(stored) => (stored.id, None),
            Err(e) => (entry.id, Some(e.to_string())),
        };

        BatchItem {
            id,
            result,
            feedback,
            history_error,
        }
    }
}

/// `now`, unless that would not be strictly after `previous`; then one
/// millisecond after `previous`. The history store still has the final say
/// on ids, see [`HistoryStore::append`].
fn next_timestamp(now: DateTime<Utc>, previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    match previous {
        Some(prev) if now.timestamp_millis() <= prev.timestamp_millis() => {
            prev + Duration::milliseconds(1)
        }
        _ => now,
    }
}

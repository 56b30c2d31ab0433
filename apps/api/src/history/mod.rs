//! History — an append-only, capped log of past analyses.
//!
//! The whole log lives under a single key and is replaced in full on every
//! write. Reads for display never fail: missing or unreadable state is an
//! empty history. Writes do fail, and the caller is told; an append whose
//! read of the current log fails is a failed write.

pub mod handlers;
pub mod storage;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::analysis::result::{format_timestamp, AnalysisResult};
use crate::history::storage::{KeyValueStore, StoreError};

/// Storage key for the serialized log.
pub const HISTORY_KEY: &str = "resumeAnalyzer_history_v1";

/// Maximum number of entries kept; older ones are dropped.
pub const MAX_ENTRIES: usize = 200;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Summary of one analysis as kept in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Millisecond timestamp of `created_at`, as a string.
    pub id: String,
    pub resume_name: String,
    pub job_name: String,
    /// Final score as a fraction in 0.0..=1.0.
    pub score: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Feedback text of the analysis. Empty for entries saved without it.
    #[serde(default)]
    pub feedback: String,
}

impl From<&AnalysisResult> for HistoryEntry {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            id: entry_id(&result.created_at),
            resume_name: result.resume_name.clone(),
            job_name: result.job_name.clone(),
            score: result.breakdown.fraction(),
            created_at: result.created_at,
            feedback: result.feedback_text(),
        }
    }
}

/// Ids are the millisecond timestamp of creation.
pub fn entry_id(created_at: &DateTime<Utc>) -> String {
    created_at.timestamp_millis().to_string()
}

impl HistoryEntry {
    /// Score as a whole percentage.
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Text offered for download: the saved feedback, or a short summary
    /// when none was saved.
    pub fn download_text(&self) -> String {
        if !self.feedback.is_empty() {
            return self.feedback.clone();
        }
        format!(
            "Resume: {}\nJob: {}\nScore: {}%\nGenerated at: {}\n\n(Full feedback not saved)",
            self.resume_name,
            self.job_name,
            self.percent(),
            format_timestamp(&self.created_at, &chrono::Local),
        )
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.resume_name.to_lowercase().contains(query_lower)
            || self.job_name.to_lowercase().contains(query_lower)
    }
}

/// The persisted history log.
///
/// `append` and `clear` are serialized through an internal lock so that two
/// concurrent read-modify-write cycles cannot lose an entry.
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// All entries, newest first. Empty when nothing is stored or the stored
    /// log cannot be read.
    pub async fn load(&self) -> Vec<HistoryEntry> {
        self.read_log().await.unwrap_or_else(|e| {
            warn!("Could not read history, treating as empty: {e}");
            Vec::new()
        })
    }

    /// Stored entries, newest first. Storage failures are returned; only a
    /// log that does not parse counts as empty.
    async fn read_log(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let Some(raw) = self.storage.get_string(HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Stored history is unreadable, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Prepends `entry`, trims the log to [`MAX_ENTRIES`] and persists it.
    ///
    /// If `entry` is not strictly newer than the current head, its timestamp
    /// and id are moved to one millisecond after the head, so ids stay unique
    /// across batches and concurrent requests. Returns the entry as stored.
    ///
    /// Nothing is written when the existing log cannot be read.
    pub async fn append(&self, mut entry: HistoryEntry) -> Result<HistoryEntry, HistoryError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.read_log().await.map_err(|e| {
            error!("Failed to read history before append: {e}");
            e
        })?;
        if let Some(head) = entries.first() {
            if entry.created_at.timestamp_millis() <= head.created_at.timestamp_millis() {
                entry.created_at = head.created_at + Duration::milliseconds(1);
                entry.id = entry_id(&entry.created_at);
            }
        }
        entries.insert(0, entry.clone());
        entries.truncate(MAX_ENTRIES);

        let serialized = serde_json::to_string(&entries)?;
        self.storage
            .set_string(HISTORY_KEY, &serialized)
            .await
            .map_err(|e| {
                error!("Failed to persist history: {e}");
                HistoryError::from(e)
            })?;
        Ok(entry)
    }

    /// Deletes the whole log.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().await;
        self.storage.remove(HISTORY_KEY).await.map_err(|e| {
            error!("Failed to clear history: {e}");
            HistoryError::from(e)
        })
    }

    /// Entries whose resume or job name contains `query`, case-insensitively,
    /// in stored order. A blank query returns everything.
    pub async fn search(&self, query: &str) -> Vec<HistoryEntry> {
        let entries = self.load().await;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return entries;
        }
        entries.into_iter().filter(|e| e.matches(&query)).collect()
    }

    /// Looks up one entry by id.
    pub async fn find(&self, id: &str) -> Option<HistoryEntry> {
        self.load().await.into_iter().find(|e| e.id == id)
    }
}

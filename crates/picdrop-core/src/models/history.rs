//! Upload history model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One successful upload, as remembered for display and clipboard copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub file_url: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Insertion-ordered record of successful uploads, most-recent-first.
///
/// Appended to only on the orchestrator's success path; never otherwise
/// mutated.
#[derive(Clone, Debug, Default)]
pub struct UploadHistory {
    entries: Vec<HistoryEntry>,
}

impl UploadHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry: the most recent upload sits at index 0.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

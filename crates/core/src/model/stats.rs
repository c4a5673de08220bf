use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Achievement, CompletedSession, HistoryEntryId};

//
// ─── STATISTICS ────────────────────────────────────────────────────────────────
//

/// Durable aggregates across every completed run.
///
/// Missing fields deserialize to their zero value, so blobs written before a
/// field existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub total_completions: u32,
    pub best_score: u32,
    /// Fastest completion in milliseconds.
    pub best_time: Option<u64>,
    pub total_images: u32,
}

impl Statistics {
    /// Fold a finished run into the aggregates. Counters only grow; best
    /// score and best time only improve.
    pub fn record(&mut self, completed: &CompletedSession) {
        self.total_completions = self.total_completions.saturating_add(1);
        self.best_score = self.best_score.max(completed.score());
        let time = completed.completion_time_ms();
        if self.best_time.is_none_or(|best| time < best) {
            self.best_time = Some(time);
        }
        self.total_images = self.total_images.saturating_add(completed.images_count());
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Maximum number of runs kept in the history log.
pub const HISTORY_LIMIT: usize = 20;

/// Immutable snapshot of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub score: u32,
    /// Completion time in milliseconds.
    #[serde(default)]
    pub completion_time: u64,
    #[serde(default)]
    pub questions_count: u32,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub hints_used: u32,
    #[serde(default)]
    pub images_count: u32,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl HistoryEntry {
    #[must_use]
    pub fn from_completed(completed: &CompletedSession) -> Self {
        let date = completed.completed_at();
        Self {
            id: HistoryEntryId::new(date.timestamp_millis()),
            date,
            score: completed.score(),
            completion_time: completed.completion_time_ms(),
            questions_count: completed.questions_count(),
            attempts: completed.attempts(),
            correct_answers: completed.correct_answers(),
            hints_used: completed.hints_used(),
            images_count: completed.images_count(),
            achievements: completed.achievements().to_vec(),
        }
    }
}

/// Newest-first log of completed runs, never longer than [`HISTORY_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Insert the newest run at the front, evicting the oldest entries past
    /// the limit. Returns how many entries were evicted.
    pub fn push_latest(&mut self, entry: HistoryEntry) -> usize {
        self.entries.insert(0, entry);
        let evicted = self.entries.len().saturating_sub(HISTORY_LIMIT);
        self.entries.truncate(HISTORY_LIMIT);
        evicted
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Images captured across every retained run.
    #[must_use]
    pub fn total_images(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, e| acc.saturating_add(e.images_count))
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

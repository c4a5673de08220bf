use std::sync::Arc;

use qrlearn_core::model::{CompletedSession, History, HistoryEntry, Statistics};
use storage::Gateway;

use crate::error::StatisticsServiceError;
use crate::warnings::{DataSet, LoadWarning};

/// Aggregates and history as currently known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Records {
    pub statistics: Statistics,
    pub history: History,
}

/// What a successful completion wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub statistics: Statistics,
    pub entry: HistoryEntry,
    /// History entries dropped to stay within the cap.
    pub evicted: usize,
}

/// Folds completed runs into the persisted statistics and history.
pub struct StatisticsService {
    gateway: Arc<Gateway>,
    records: Records,
}

impl StatisticsService {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            records: Records::default(),
        }
    }

    /// Load both blobs, replacing whatever cannot be read with defaults.
    ///
    /// Absent blobs are not an error and produce no warning.
    pub async fn load(&mut self) -> Vec<LoadWarning> {
        let mut warnings = Vec::new();

        let statistics = match self.gateway.load_statistics().await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warnings.push(LoadWarning::new(DataSet::Statistics, err));
                Statistics::default()
            }
        };
        let history = match self.gateway.load_history().await {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                warnings.push(LoadWarning::new(DataSet::History, err));
                History::default()
            }
        };

        tracing::debug!(
            completions = statistics.total_completions,
            history = history.len(),
            "records loaded"
        );
        self.records = Records {
            statistics,
            history,
        };
        warnings
    }

    #[must_use]
    pub fn records(&self) -> &Records {
        &self.records
    }

    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.records.statistics
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.records.history
    }

    /// Fold a finished run into statistics and prepend it to history.
    ///
    /// Both blobs are written in one batch. On failure nothing in memory
    /// changes and the same run can be recorded again.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsServiceError::Storage` if persistence fails.
    pub async fn record_completion(
        &mut self,
        completed: &CompletedSession,
    ) -> Result<CompletionRecord, StatisticsServiceError> {
        let mut next = self.records.clone();
        next.statistics.record(completed);
        let entry = HistoryEntry::from_completed(completed);
        let evicted = next.history.push_latest(entry.clone());

        self.gateway
            .save_records(&next.statistics, &next.history)
            .await?;
        self.records = next;

        tracing::info!(
            score = entry.score,
            completion_ms = entry.completion_time,
            completions = self.records.statistics.total_completions,
            evicted,
            "completion recorded"
        );
        Ok(CompletionRecord {
            statistics: self.records.statistics.clone(),
            entry,
            evicted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::Duration;
    use qrlearn_core::model::{CapturedImage, HISTORY_LIMIT, RunId, RunTally};
    use qrlearn_core::time::fixed_now;
    use storage::{InMemoryStore, KeyValueStore, StorageError, StorageKeys};

    fn completed(score: u32, secs: i64, images: usize) -> CompletedSession {
        let started = fixed_now();
        let tally = RunTally {
            questions_count: 4,
            score,
            attempts: 4,
            correct_answers: 4,
            hints_used: 0,
            captured_images: (0..images)
                .map(|step_index| CapturedImage {
                    timestamp: started,
                    step_index,
                })
                .collect(),
        };
        CompletedSession::new(
            RunId::generate(),
            started,
            started + Duration::seconds(secs),
            tally,
            Vec::new(),
        )
        .unwrap()
    }

    fn service(store: &InMemoryStore) -> StatisticsService {
        StatisticsService::new(Arc::new(Gateway::new(
            Arc::new(store.clone()),
            StorageKeys::default(),
        )))
    }

    #[tokio::test]
    async fn absent_records_load_as_defaults_without_warning() {
        let store = InMemoryStore::new();
        let mut stats = service(&store);
        assert!(stats.load().await.is_empty());
        assert_eq!(stats.records(), &Records::default());
    }

    #[tokio::test]
    async fn corrupt_history_warns_and_keeps_statistics() {
        let store = InMemoryStore::new();
        store
            .put(
                "qrlearning_advanced_statistics",
                r#"{"totalCompletions":3,"bestScore":70}"#,
            )
            .await
            .unwrap();
        store
            .put("qrlearning_advanced_history", "[{broken")
            .await
            .unwrap();
        let mut stats = service(&store);

        let warnings = stats.load().await;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].data_set, DataSet::History);
        assert_eq!(stats.statistics().total_completions, 3);
        assert_eq!(stats.statistics().best_time, None);
        assert!(stats.history().is_empty());
    }

    #[tokio::test]
    async fn record_completion_updates_extrema_and_persists() {
        let store = InMemoryStore::new();
        let mut stats = service(&store);
        stats.load().await;

        stats.record_completion(&completed(60, 90, 2)).await.unwrap();
        let second = stats.record_completion(&completed(40, 60, 1)).await.unwrap();

        assert_eq!(second.statistics.total_completions, 2);
        assert_eq!(second.statistics.best_score, 60);
        assert_eq!(second.statistics.best_time, Some(60_000));
        assert_eq!(second.statistics.total_images, 3);
        assert_eq!(stats.history().latest().map(|e| e.score), Some(40));

        let mut reloaded = service(&store);
        assert!(reloaded.load().await.is_empty());
        assert_eq!(reloaded.records(), stats.records());
    }

    #[tokio::test]
    async fn history_keeps_most_recent_entries() {
        let store = InMemoryStore::new();
        let mut stats = service(&store);
        stats.load().await;

        for score in 1..=20 {
            stats.record_completion(&completed(score, 30, 0)).await.unwrap();
        }
        let record = stats.record_completion(&completed(21, 30, 0)).await.unwrap();

        assert_eq!(record.evicted, 1);
        assert_eq!(stats.history().len(), HISTORY_LIMIT);
        let scores: Vec<u32> = stats.history().entries().iter().map(|e| e.score).collect();
        assert_eq!(scores.first(), Some(&21));
        assert_eq!(scores.last(), Some(&2));
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn put_many(&self, _entries: &[(String, String)]) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    #[tokio::test]
    async fn failed_save_leaves_records_untouched() {
        let mut stats = StatisticsService::new(Arc::new(Gateway::new(
            Arc::new(FailingStore),
            StorageKeys::default(),
        )));
        stats.load().await;

        let err = stats.record_completion(&completed(50, 30, 0)).await;
        assert!(matches!(err, Err(StatisticsServiceError::Storage(_))));
        assert_eq!(stats.records(), &Records::default());
    }
}

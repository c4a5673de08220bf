use std::sync::Arc;

use qrlearn_core::defaults::{default_catalog, default_questions};
use qrlearn_core::model::{AchievementCatalog, Question};
use storage::{Gateway, Storage, StorageKeys};

use crate::Clock;
use crate::error::{AppServicesError, SessionError};
use crate::export::ExportDocument;
use crate::question_service::QuestionService;
use crate::sessions::{CompletionReport, ScanSession, SessionLoopService};
use crate::statistics_service::StatisticsService;
use crate::warnings::LoadWarning;

/// Application state built once at startup and handed to the front end.
///
/// Owns every service; there is no process-wide instance.
pub struct AppServices {
    clock: Clock,
    questions: QuestionService,
    statistics: StatisticsService,
    sessions: SessionLoopService,
    warnings: Vec<LoadWarning>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage with the default seed and catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        keys: StorageKeys,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, clock, keys, default_questions(), default_catalog()).await)
    }

    /// Build services backed by in-memory storage (tests and previews).
    pub async fn in_memory(clock: Clock) -> Self {
        Self::from_storage(
            Storage::in_memory(),
            clock,
            StorageKeys::default(),
            default_questions(),
            default_catalog(),
        )
        .await
    }

    /// Build services over any storage, with an injected seed and catalog.
    ///
    /// Loading never fails; unreadable data is replaced by defaults and
    /// reported through [`warnings`](Self::warnings).
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        keys: StorageKeys,
        seed: Vec<Question>,
        catalog: AchievementCatalog,
    ) -> Self {
        let gateway = Arc::new(Gateway::new(Arc::clone(&storage.kv), keys));

        let mut questions = QuestionService::new(clock, Arc::clone(&gateway), seed);
        let mut statistics = StatisticsService::new(gateway);
        let mut warnings: Vec<LoadWarning> = questions.load().await.into_iter().collect();
        warnings.extend(statistics.load().await);

        Self {
            clock,
            questions,
            statistics,
            sessions: SessionLoopService::new(clock, catalog),
            warnings,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionService {
        &self.questions
    }

    pub fn questions_mut(&mut self) -> &mut QuestionService {
        &mut self.questions
    }

    #[must_use]
    pub fn statistics(&self) -> &StatisticsService {
        &self.statistics
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionLoopService {
        &self.sessions
    }

    /// Non-fatal problems met while loading persisted data.
    #[must_use]
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Start a run over the current question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if there are no questions.
    pub fn start_session(&self) -> Result<ScanSession, SessionError> {
        self.sessions.start_session(self.questions.questions())
    }

    /// Complete and record a run.
    ///
    /// # Errors
    ///
    /// See [`SessionLoopService::finish`].
    pub async fn finish_session(
        &mut self,
        session: &mut ScanSession,
    ) -> Result<CompletionReport, SessionError> {
        self.sessions.finish(session, &mut self.statistics).await
    }

    /// Snapshot every persisted dataset for export.
    #[must_use]
    pub fn export(&self) -> ExportDocument {
        ExportDocument::new(
            self.questions.questions().to_vec(),
            self.statistics.statistics().clone(),
            self.statistics.history().clone(),
            self.clock.now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use qrlearn_core::time::fixed_clock;
    use storage::InMemoryStore;

    #[tokio::test]
    async fn in_memory_boot_seeds_questions() {
        let app = AppServices::in_memory(fixed_clock()).await;
        assert_eq!(app.questions().len(), 4);
        assert!(app.warnings().is_empty());
        assert_eq!(app.statistics().statistics().total_completions, 0);
    }

    #[tokio::test]
    async fn corrupt_blobs_become_warnings() {
        let store = InMemoryStore::new();
        for key in ["questions", "statistics", "history"] {
            storage::KeyValueStore::put(&store, &format!("qrlearning_advanced_{key}"), "oops")
                .await
                .unwrap();
        }
        let storage = Storage {
            kv: Arc::new(store),
        };

        let app = AppServices::from_storage(
            storage,
            fixed_clock(),
            StorageKeys::default(),
            default_questions(),
            default_catalog(),
        )
        .await;

        assert_eq!(app.warnings().len(), 3);
        assert_eq!(app.questions().len(), 4);
    }

    #[tokio::test]
    async fn injected_seed_and_prefix_are_used() {
        let seed: Vec<Question> = default_questions().into_iter().take(2).collect();
        let app = AppServices::from_storage(
            Storage::in_memory(),
            fixed_clock(),
            StorageKeys::with_prefix("test_"),
            seed,
            default_catalog(),
        )
        .await;

        assert_eq!(app.questions().len(), 2);
        let session = app.start_session().unwrap();
        assert_eq!(session.questions().len(), 2);
    }
}

use qrlearn_core::model::{AchievementCatalog, CompletedSession, Question, RunId};

use super::progress::SessionProgress;
use super::service::{ScanSession, SessionPhase};
use crate::Clock;
use crate::error::SessionError;
use crate::statistics_service::{CompletionRecord, StatisticsService};

/// A completed run together with what was persisted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub session: CompletedSession,
    pub record: CompletionRecord,
}

/// Wires the pure session machine to the clock and to persistence.
#[derive(Debug, Clone)]
pub struct SessionLoopService {
    clock: Clock,
    catalog: AchievementCatalog,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock, catalog: AchievementCatalog) -> Self {
        Self { clock, catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &AchievementCatalog {
        &self.catalog
    }

    /// Start a run over a snapshot of the given questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty.
    pub fn start_session(&self, questions: &[Question]) -> Result<ScanSession, SessionError> {
        let mut session = ScanSession::new(questions.to_vec(), self.catalog.clone());
        session.start(self.clock.now())?;
        Ok(session)
    }

    /// Discard the current run and start over.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the session has no questions.
    pub fn restart(&self, session: &mut ScanSession) -> Result<RunId, SessionError> {
        session.reset(self.clock.now())
    }

    /// Attach an image captured now to the current step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` outside an active run or for a stale run.
    pub fn capture_image(
        &self,
        session: &mut ScanSession,
        run: RunId,
    ) -> Result<usize, SessionError> {
        session.record_image_captured(run, self.clock.now())
    }

    #[must_use]
    pub fn progress(&self, session: &ScanSession) -> SessionProgress {
        session.progress(self.clock.now())
    }

    /// Complete the run if needed and record it into statistics and history.
    ///
    /// Safe to call again after a storage failure: the completed run is kept
    /// and recorded on the next call. Recording twice is refused.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRecorded` if this run is already recorded.
    /// Returns `SessionError::Statistics` if persistence fails.
    /// Returns other `SessionError` variants if the run cannot be completed yet.
    pub async fn finish(
        &self,
        session: &mut ScanSession,
        statistics: &mut StatisticsService,
    ) -> Result<CompletionReport, SessionError> {
        if session.is_recorded() {
            return Err(SessionError::AlreadyRecorded);
        }
        let completed = match session.phase() {
            SessionPhase::NotStarted => return Err(SessionError::NotStarted),
            SessionPhase::Active => session.complete(self.clock.now())?,
            SessionPhase::Completed => session
                .completed()
                .cloned()
                .ok_or(SessionError::Completed)?,
        };

        let record = statistics.record_completion(&completed).await?;
        session.mark_recorded();

        tracing::info!(
            run = %completed.run_id(),
            score = completed.score(),
            completion_ms = completed.completion_time_ms(),
            "session finished"
        );
        Ok(CompletionReport {
            session: completed,
            record,
        })
    }
}

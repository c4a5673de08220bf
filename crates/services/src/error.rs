//! Shared error types for the services crate.

use thiserror::Error;

use qrlearn_core::model::{CompletedSessionError, QuestionError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionServiceError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the session state machine and the session loop.
///
/// Everything except `Summary` and `Statistics` is a caller contract violation:
/// the call arrived in a state where it has no meaning.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session has not been started")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error("input belongs to a previous run")]
    StaleRun,
    #[error("current step is already answered; advance or complete first")]
    StepAlreadyCleared,
    #[error("current step has not been answered correctly yet")]
    StepNotCleared,
    #[error("already on the last step; complete the session instead")]
    LastStep,
    #[error("the last step has not been reached")]
    NotOnLastStep,
    #[error("session completion is already recorded")]
    AlreadyRecorded,
    #[error(transparent)]
    Summary(#[from] CompletedSessionError),
    #[error(transparent)]
    Statistics(#[from] StatisticsServiceError),
}

impl SessionError {
    /// Whether this error reports a call made in the wrong state.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        !matches!(self, SessionError::Summary(_) | SessionError::Statistics(_))
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

/// Errors emitted while exporting data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

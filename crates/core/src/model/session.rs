use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::SessionMetrics;
use crate::model::{Achievement, RunId};
use crate::time::elapsed_ms;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompletedSessionError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct answers ({correct}) exceed attempts ({attempts})")]
    CountMismatch { correct: u32, attempts: u32 },
}

/// Metadata for an image captured while a step was on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedImage {
    pub timestamp: DateTime<Utc>,
    pub step_index: usize,
}

/// Counters of a run at the moment it finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTally {
    pub questions_count: u32,
    pub score: u32,
    pub attempts: u32,
    pub correct_answers: u32,
    pub hints_used: u32,
    pub captured_images: Vec<CapturedImage>,
}

/// A finished run, with achievements evaluated and bonus points applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSession {
    run_id: RunId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    tally: RunTally,
    achievements: Vec<Achievement>,
}

impl CompletedSession {
    /// Seal a run.
    ///
    /// # Errors
    ///
    /// Returns `CompletedSessionError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `CompletedSessionError::CountMismatch` if more answers were correct than attempted.
    pub fn new(
        run_id: RunId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        tally: RunTally,
        achievements: Vec<Achievement>,
    ) -> Result<Self, CompletedSessionError> {
        if completed_at < started_at {
            return Err(CompletedSessionError::InvalidTimeRange);
        }
        if tally.correct_answers > tally.attempts {
            return Err(CompletedSessionError::CountMismatch {
                correct: tally.correct_answers,
                attempts: tally.attempts,
            });
        }
        Ok(Self {
            run_id,
            started_at,
            completed_at,
            tally,
            achievements,
        })
    }

    #[must_use]
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn completion_time_ms(&self) -> u64 {
        elapsed_ms(self.started_at, self.completed_at)
    }

    #[must_use]
    pub fn questions_count(&self) -> u32 {
        self.tally.questions_count
    }

    /// Points earned from answers alone.
    #[must_use]
    pub fn base_score(&self) -> u32 {
        self.tally.score
    }

    /// Sum of the bonus points of every earned achievement.
    #[must_use]
    pub fn bonus_points(&self) -> u32 {
        self.achievements
            .iter()
            .fold(0_u32, |acc, a| acc.saturating_add(a.points))
    }

    /// Final score: answer points plus achievement bonuses, each counted once.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.tally.score.saturating_add(self.bonus_points())
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.tally.attempts
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.tally.correct_answers
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        self.tally.hints_used
    }

    #[must_use]
    pub fn captured_images(&self) -> &[CapturedImage] {
        &self.tally.captured_images
    }

    #[must_use]
    pub fn images_count(&self) -> u32 {
        u32::try_from(self.tally.captured_images.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    #[must_use]
    pub fn metrics(&self) -> SessionMetrics {
        SessionMetrics {
            attempts: self.tally.attempts,
            correct_answers: self.tally.correct_answers,
            captured_images: self.tally.captured_images.len(),
            completion_time_ms: self.completion_time_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AchievementId;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn tally(attempts: u32, correct: u32) -> RunTally {
        RunTally {
            questions_count: 4,
            score: 70,
            attempts,
            correct_answers: correct,
            hints_used: 0,
            captured_images: Vec::new(),
        }
    }

    #[test]
    fn score_includes_bonus_once() {
        let now = fixed_now();
        let completed = CompletedSession::new(
            RunId::generate(),
            now,
            now + Duration::seconds(30),
            tally(4, 4),
            vec![
                Achievement::new(AchievementId::FirstScan, "", "", "", 5),
                Achievement::new(AchievementId::SpeedDemon, "", "", "", 30),
            ],
        )
        .unwrap();

        assert_eq!(completed.base_score(), 70);
        assert_eq!(completed.bonus_points(), 35);
        assert_eq!(completed.score(), 105);
        assert_eq!(completed.completion_time_ms(), 30_000);
    }

    #[test]
    fn rejects_reversed_time_range() {
        let now = fixed_now();
        let err = CompletedSession::new(
            RunId::generate(),
            now,
            now - Duration::seconds(1),
            tally(1, 1),
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, CompletedSessionError::InvalidTimeRange);
    }

    #[test]
    fn rejects_more_correct_than_attempted() {
        let now = fixed_now();
        let err =
            CompletedSession::new(RunId::generate(), now, now, tally(2, 3), Vec::new()).unwrap_err();
        assert!(matches!(err, CompletedSessionError::CountMismatch { .. }));
    }
}

//! Achievement rules applied once to a finished run.
//!
//! The rules are pure: given the run's counters and the number of questions
//! in the sequence they decide which badges were earned. Titles, icons and
//! bonus points come from an [`AchievementCatalog`], so a deployment can change
//! the copy without touching the rules.

use crate::model::{Achievement, AchievementCatalog, AchievementId};

/// A run must finish strictly under this many milliseconds for `speed_demon`.
pub const SPEED_DEMON_LIMIT_MS: u64 = 120_000;

/// Minimum captured images for `photographer`.
pub const PHOTOGRAPHER_MIN_IMAGES: usize = 5;

/// Counters the rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionMetrics {
    pub attempts: u32,
    pub correct_answers: u32,
    pub captured_images: usize,
    pub completion_time_ms: u64,
}

/// Whether a single rule holds for the given run.
#[must_use]
pub fn is_earned(id: AchievementId, metrics: &SessionMetrics, total_questions: usize) -> bool {
    match id {
        AchievementId::FirstScan => metrics.attempts > 0,
        AchievementId::PerfectRun => {
            let total = u32::try_from(total_questions).unwrap_or(u32::MAX);
            metrics.correct_answers == total && metrics.attempts == total
        }
        AchievementId::SpeedDemon => metrics.completion_time_ms < SPEED_DEMON_LIMIT_MS,
        AchievementId::Photographer => metrics.captured_images >= PHOTOGRAPHER_MIN_IMAGES,
    }
}

/// Ids of every rule that holds, in catalog order of [`AchievementId::ALL`].
#[must_use]
pub fn earned_ids(metrics: &SessionMetrics, total_questions: usize) -> Vec<AchievementId> {
    AchievementId::ALL
        .into_iter()
        .filter(|id| is_earned(*id, metrics, total_questions))
        .collect()
}

/// Resolve earned ids against the catalog. Ids missing from the catalog are skipped.
#[must_use]
pub fn evaluate(
    metrics: &SessionMetrics,
    total_questions: usize,
    catalog: &AchievementCatalog,
) -> Vec<Achievement> {
    earned_ids(metrics, total_questions)
        .into_iter()
        .filter_map(|id| catalog.get(id).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_catalog;

    fn metrics(attempts: u32, correct: u32, images: usize, ms: u64) -> SessionMetrics {
        SessionMetrics {
            attempts,
            correct_answers: correct,
            captured_images: images,
            completion_time_ms: ms,
        }
    }

    #[test]
    fn perfect_run_requires_no_wrong_attempts() {
        assert!(is_earned(AchievementId::PerfectRun, &metrics(4, 4, 0, 0), 4));
        assert!(!is_earned(AchievementId::PerfectRun, &metrics(5, 4, 0, 0), 4));
    }

    #[test]
    fn speed_demon_boundary() {
        assert!(is_earned(AchievementId::SpeedDemon, &metrics(4, 4, 0, 119_999), 4));
        assert!(!is_earned(AchievementId::SpeedDemon, &metrics(4, 4, 0, 120_000), 4));
        assert!(!is_earned(AchievementId::SpeedDemon, &metrics(4, 4, 0, 120_001), 4));
    }

    #[test]
    fn photographer_needs_five_images() {
        assert!(!is_earned(AchievementId::Photographer, &metrics(1, 1, 4, 0), 1));
        assert!(is_earned(AchievementId::Photographer, &metrics(1, 1, 5, 0), 1));
    }

    #[test]
    fn first_scan_needs_an_attempt() {
        assert!(!is_earned(AchievementId::FirstScan, &metrics(0, 0, 0, 0), 4));
        assert!(is_earned(AchievementId::FirstScan, &metrics(1, 0, 0, 0), 4));
    }

    #[test]
    fn evaluate_resolves_catalog_entries() {
        let earned = evaluate(&metrics(4, 4, 6, 60_000), 4, &default_catalog());
        let ids: Vec<AchievementId> = earned.iter().map(|a| a.id).collect();
        assert_eq!(ids, AchievementId::ALL.to_vec());
        let bonus: u32 = earned.iter().map(|a| a.points).sum();
        assert_eq!(bonus, 5 + 50 + 30 + 20);
    }

    #[test]
    fn evaluate_skips_ids_missing_from_catalog() {
        let catalog = AchievementCatalog::new(vec![Achievement::new(
            AchievementId::FirstScan,
            "First",
            "",
            "",
            5,
        )]);
        let earned = evaluate(&metrics(4, 4, 6, 60_000), 4, &catalog);
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].id, AchievementId::FirstScan);
    }
}

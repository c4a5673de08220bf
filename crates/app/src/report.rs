//! Plain-text rendering of questions, statistics and history.

use std::fmt::Write as _;

use qrlearn_core::model::{Achievement, History, Question, Statistics};
use qrlearn_core::time::{format_best_time, format_clock};
use services::CompletionReport;

pub fn question_line(question: &Question) -> String {
    format!(
        "{:>2}. [{}] {} -> {} ({} pts)",
        question.step(),
        question.id(),
        question.prompt(),
        question.expected_answer(),
        question.points().value()
    )
}

pub fn question_list(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "no questions; run `questions reset` to restore the defaults\n".to_string();
    }
    let mut out = String::new();
    for question in questions {
        let _ = writeln!(out, "{}", question_line(question));
        if !question.description().is_empty() {
            let _ = writeln!(out, "      {}", question.description());
        }
        for hint in question.hints() {
            let _ = writeln!(out, "      hint: {hint}");
        }
    }
    out
}

pub fn statistics(stats: &Statistics, history: &History) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "completions:  {}", stats.total_completions);
    let _ = writeln!(out, "best score:   {}", stats.best_score);
    let _ = writeln!(out, "best time:    {}", format_best_time(stats.best_time));
    let _ = writeln!(out, "total images: {}", stats.total_images);
    let _ = writeln!(out, "gallery:      {} images in recent runs", history.total_images());
    out
}

fn badges(achievements: &[Achievement]) -> String {
    achievements
        .iter()
        .map(|a| a.icon.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn history(history: &History) -> String {
    if history.is_empty() {
        return "no completed runs yet\n".to_string();
    }
    let mut out = String::new();
    for entry in history.entries() {
        let _ = writeln!(
            out,
            "{}  score {:>4}  time {}  correct {}/{}  hints {}  images {}  {}",
            entry.date.format("%Y-%m-%d %H:%M"),
            entry.score,
            format_clock(entry.completion_time),
            entry.correct_answers,
            entry.attempts,
            entry.hints_used,
            entry.images_count,
            badges(&entry.achievements)
        );
    }
    out
}

pub fn completion(report: &CompletionReport) -> String {
    let session = &report.session;
    let mut out = String::new();
    let _ = writeln!(out, "all steps complete!");
    let _ = writeln!(
        out,
        "score {} ({} + {} bonus), time {}, correct {}/{}, hints {}, images {}",
        session.score(),
        session.base_score(),
        session.bonus_points(),
        format_clock(session.completion_time_ms()),
        session.correct_answers(),
        session.attempts(),
        session.hints_used(),
        session.images_count()
    );
    for achievement in session.achievements() {
        let _ = writeln!(
            out,
            "  {} {} (+{}): {}",
            achievement.icon, achievement.title, achievement.points, achievement.description
        );
    }
    if report.record.evicted > 0 {
        let _ = writeln!(out, "oldest history entry dropped");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use qrlearn_core::defaults::default_questions;

    #[test]
    fn question_line_shows_step_and_answer() {
        let questions = default_questions();
        assert_eq!(
            question_line(&questions[1]),
            " 2. [q2] Scan QR code yang berisi angka '123' -> 123 (15 pts)"
        );
    }

    #[test]
    fn empty_statistics_show_placeholder_time() {
        let text = statistics(&Statistics::default(), &History::default());
        assert!(text.contains("best time:    --:--"));
        assert!(text.contains("completions:  0"));
    }

    #[test]
    fn empty_history_has_a_message() {
        assert_eq!(history(&History::default()), "no completed runs yet\n");
    }
}

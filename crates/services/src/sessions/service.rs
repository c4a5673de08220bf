use chrono::{DateTime, Utc};

use qrlearn_core::achievements::{SessionMetrics, evaluate};
use qrlearn_core::model::{
    AchievementCatalog, CapturedImage, CompletedSession, Question, RunId, RunTally,
};
use qrlearn_core::time::elapsed_ms;

use super::progress::SessionProgress;
use crate::error::SessionError;

/// Coarse lifecycle of a [`ScanSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Active,
    Completed,
}

/// What the caller should do after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Wrong answer; the same step stays open.
    Retry,
    /// Correct answer; call `advance` to open the next step.
    Advance,
    /// Correct answer on the last step; call `complete`.
    Complete,
}

/// Outcome of validating one scanned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub is_correct: bool,
    pub scanned_text: String,
    pub expected_answer: String,
    pub points_awarded: u32,
    /// A correct scan invites an optional image capture.
    pub capture_suggested: bool,
    pub next: NextStep,
}

/// Discrete inputs accepted by [`ScanSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Reset,
    Scan { run: RunId, text: String },
    Advance,
    HintUsed,
    RevealHints,
    ImageCaptured { run: RunId },
    Complete,
}

/// Side effects for the presentation layer, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    Started { run: RunId },
    ScanEvaluated(ScanResult),
    SuggestCapture { step_index: usize },
    Advanced { step_index: usize },
    HintRecorded { hints_used: u32 },
    HintsRevealed(Vec<String>),
    ImageStored { count: usize },
    Completed(CompletedSession),
}

#[derive(Debug, Clone)]
struct ActiveRun {
    run_id: RunId,
    started_at: DateTime<Utc>,
    current_index: usize,
    step_cleared: bool,
    score: u32,
    attempts: u32,
    correct_answers: u32,
    hints_used: u32,
    captured_images: Vec<CapturedImage>,
}

impl ActiveRun {
    fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: RunId::generate(),
            started_at,
            current_index: 0,
            step_cleared: false,
            score: 0,
            attempts: 0,
            correct_answers: 0,
            hints_used: 0,
            captured_images: Vec::new(),
        }
    }

    fn metrics(&self, now: DateTime<Utc>) -> SessionMetrics {
        SessionMetrics {
            attempts: self.attempts,
            correct_answers: self.correct_answers,
            captured_images: self.captured_images.len(),
            completion_time_ms: elapsed_ms(self.started_at, now),
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    NotStarted,
    Active(ActiveRun),
    Completed {
        completed: CompletedSession,
        recorded: bool,
    },
}

/// The single live run over an ordered question list.
///
/// Pure state machine: no I/O and no clock of its own. Every time-dependent
/// call takes `now`. Scans and captures carry the [`RunId`] they were issued
/// for, so input from a run that has since been reset is rejected.
#[derive(Debug, Clone)]
pub struct ScanSession {
    questions: Vec<Question>,
    catalog: AchievementCatalog,
    state: State,
}

impl ScanSession {
    #[must_use]
    pub fn new(questions: Vec<Question>, catalog: AchievementCatalog) -> Self {
        Self {
            questions,
            catalog,
            state: State::NotStarted,
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Begin a fresh run from any state, discarding the current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if there are no questions to play.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<RunId, SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let run = ActiveRun::new(now);
        let run_id = run.run_id;
        self.state = State::Active(run);
        tracing::debug!(run = %run_id, questions = self.questions.len(), "session started");
        Ok(run_id)
    }

    /// Same as [`start`](Self::start). An unrecorded completed run is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if there are no questions to play.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<RunId, SessionError> {
        self.start(now)
    }

    /// Validate a scanned payload against the current step.
    ///
    /// Every accepted call counts as an attempt. A correct answer awards the
    /// step's points once; further scans on the same step are rejected until
    /// the caller advances.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` or `SessionError::Completed` outside an
    /// active run, `SessionError::StaleRun` for input from a previous run and
    /// `SessionError::StepAlreadyCleared` after the step was already answered.
    pub fn submit_scan(&mut self, run: RunId, raw: &str) -> Result<ScanResult, SessionError> {
        let total = self.questions.len();
        let inactive = self.inactive_error();
        let State::Active(active) = &mut self.state else {
            return Err(inactive);
        };
        if active.run_id != run {
            return Err(SessionError::StaleRun);
        }
        if active.step_cleared {
            return Err(SessionError::StepAlreadyCleared);
        }
        let question = self
            .questions
            .get(active.current_index)
            .ok_or(SessionError::Completed)?;

        active.attempts = active.attempts.saturating_add(1);
        let is_correct = question.is_answered_by(raw);
        let points_awarded = if is_correct {
            question.points().value()
        } else {
            0
        };
        if is_correct {
            active.score = active.score.saturating_add(points_awarded);
            active.correct_answers = active.correct_answers.saturating_add(1);
            active.step_cleared = true;
        }

        let next = match (is_correct, active.current_index + 1 == total) {
            (false, _) => NextStep::Retry,
            (true, false) => NextStep::Advance,
            (true, true) => NextStep::Complete,
        };
        tracing::debug!(
            step = active.current_index,
            is_correct,
            attempts = active.attempts,
            "scan evaluated"
        );

        Ok(ScanResult {
            is_correct,
            scanned_text: raw.to_string(),
            expected_answer: question.expected_answer().to_string(),
            points_awarded,
            capture_suggested: is_correct,
            next,
        })
    }

    /// Open the next step. Returns the new zero-based step index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StepNotCleared` before a correct scan and
    /// `SessionError::LastStep` on the final step.
    pub fn advance(&mut self) -> Result<usize, SessionError> {
        let total = self.questions.len();
        let active = self.active_mut()?;
        if !active.step_cleared {
            return Err(SessionError::StepNotCleared);
        }
        if active.current_index + 1 >= total {
            return Err(SessionError::LastStep);
        }
        active.current_index += 1;
        active.step_cleared = false;
        tracing::debug!(step = active.current_index, "advanced");
        Ok(active.current_index)
    }

    /// Count a hint request. Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` outside an active run.
    pub fn record_hint_used(&mut self) -> Result<u32, SessionError> {
        let active = self.active_mut()?;
        active.hints_used = active.hints_used.saturating_add(1);
        Ok(active.hints_used)
    }

    /// Return the current step's hints, counting a hint use only when there
    /// is something to show.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` outside an active run.
    pub fn reveal_hints(&mut self) -> Result<Vec<String>, SessionError> {
        let inactive = self.inactive_error();
        let State::Active(active) = &mut self.state else {
            return Err(inactive);
        };
        let hints = self
            .questions
            .get(active.current_index)
            .map(|q| q.hints().to_vec())
            .unwrap_or_default();
        if !hints.is_empty() {
            active.hints_used = active.hints_used.saturating_add(1);
        }
        Ok(hints)
    }

    /// Attach an image taken at `at` to the current step. Returns the number
    /// of images captured so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` outside an active run or for a stale run.
    pub fn record_image_captured(
        &mut self,
        run: RunId,
        at: DateTime<Utc>,
    ) -> Result<usize, SessionError> {
        let active = self.active_mut()?;
        if active.run_id != run {
            return Err(SessionError::StaleRun);
        }
        active.captured_images.push(CapturedImage {
            timestamp: at,
            step_index: active.current_index,
        });
        Ok(active.captured_images.len())
    }

    /// Seal the run once the last step has been answered correctly.
    ///
    /// Achievements are evaluated here, exactly once, and their bonus points
    /// are part of the returned session's score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotOnLastStep` or `SessionError::StepNotCleared`
    /// if the run is not finished, and `SessionError::Summary` if the counters
    /// are inconsistent.
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<CompletedSession, SessionError> {
        let total = self.questions.len();
        let State::Active(active) = &self.state else {
            return Err(self.inactive_error());
        };
        if active.current_index + 1 != total {
            return Err(SessionError::NotOnLastStep);
        }
        if !active.step_cleared {
            return Err(SessionError::StepNotCleared);
        }

        let achievements = evaluate(&active.metrics(now), total, &self.catalog);
        let tally = RunTally {
            questions_count: u32::try_from(total).unwrap_or(u32::MAX),
            score: active.score,
            attempts: active.attempts,
            correct_answers: active.correct_answers,
            hints_used: active.hints_used,
            captured_images: active.captured_images.clone(),
        };
        let completed =
            CompletedSession::new(active.run_id, active.started_at, now, tally, achievements)?;

        tracing::debug!(
            run = %completed.run_id(),
            score = completed.score(),
            achievements = completed.achievements().len(),
            "session completed"
        );
        self.state = State::Completed {
            completed: completed.clone(),
            recorded: false,
        };
        Ok(completed)
    }

    /// Drive the machine with a discrete event and collect its effects.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying transition; state is unchanged.
    pub fn apply(
        &mut self,
        event: SessionEvent,
        now: DateTime<Utc>,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let effects = match event {
            SessionEvent::Start => vec![SessionEffect::Started {
                run: self.start(now)?,
            }],
            SessionEvent::Reset => vec![SessionEffect::Started {
                run: self.reset(now)?,
            }],
            SessionEvent::Scan { run, text } => {
                let step_index = self.current_step_index();
                let result = self.submit_scan(run, &text)?;
                let suggest = result.capture_suggested;
                let mut effects = vec![SessionEffect::ScanEvaluated(result)];
                if suggest {
                    effects.push(SessionEffect::SuggestCapture { step_index });
                }
                effects
            }
            SessionEvent::Advance => vec![SessionEffect::Advanced {
                step_index: self.advance()?,
            }],
            SessionEvent::HintUsed => vec![SessionEffect::HintRecorded {
                hints_used: self.record_hint_used()?,
            }],
            SessionEvent::RevealHints => vec![SessionEffect::HintsRevealed(self.reveal_hints()?)],
            SessionEvent::ImageCaptured { run } => vec![SessionEffect::ImageStored {
                count: self.record_image_captured(run, now)?,
            }],
            SessionEvent::Complete => vec![SessionEffect::Completed(self.complete(now)?)],
        };
        Ok(effects)
    }

    pub(crate) fn mark_recorded(&mut self) {
        if let State::Completed { recorded, .. } = &mut self.state {
            *recorded = true;
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::NotStarted => SessionPhase::NotStarted,
            State::Active(_) => SessionPhase::Active,
            State::Completed { .. } => SessionPhase::Completed,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn run_id(&self) -> Option<RunId> {
        match &self.state {
            State::NotStarted => None,
            State::Active(active) => Some(active.run_id),
            State::Completed { completed, .. } => Some(completed.run_id()),
        }
    }

    /// Zero-based index of the open step; equals the question count once completed.
    #[must_use]
    pub fn current_step_index(&self) -> usize {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => active.current_index,
            State::Completed { .. } => self.questions.len(),
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::Active(active) => self.questions.get(active.current_index),
            _ => None,
        }
    }

    /// Whether the open step has already been answered correctly.
    #[must_use]
    pub fn is_step_cleared(&self) -> bool {
        matches!(&self.state, State::Active(active) if active.step_cleared)
    }

    /// Running score; includes achievement bonuses once completed.
    #[must_use]
    pub fn score(&self) -> u32 {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => active.score,
            State::Completed { completed, .. } => completed.score(),
        }
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => active.attempts,
            State::Completed { completed, .. } => completed.attempts(),
        }
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => active.correct_answers,
            State::Completed { completed, .. } => completed.correct_answers(),
        }
    }

    #[must_use]
    pub fn hints_used(&self) -> u32 {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => active.hints_used,
            State::Completed { completed, .. } => completed.hints_used(),
        }
    }

    #[must_use]
    pub fn captured_images(&self) -> &[CapturedImage] {
        match &self.state {
            State::NotStarted => &[],
            State::Active(active) => &active.captured_images,
            State::Completed { completed, .. } => completed.captured_images(),
        }
    }

    /// Elapsed run time, derived on demand. Frozen at completion.
    #[must_use]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        match &self.state {
            State::NotStarted => 0,
            State::Active(active) => elapsed_ms(active.started_at, now),
            State::Completed { completed, .. } => completed.completion_time_ms(),
        }
    }

    #[must_use]
    pub fn completed(&self) -> Option<&CompletedSession> {
        match &self.state {
            State::Completed { completed, .. } => Some(completed),
            _ => None,
        }
    }

    /// Whether the completed run has been written to statistics and history.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self.state, State::Completed { recorded: true, .. })
    }

    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> SessionProgress {
        let total_steps = self.questions.len();
        let phase = self.phase();
        let index = self.current_step_index();
        SessionProgress {
            current_step: match phase {
                SessionPhase::NotStarted => 0,
                SessionPhase::Active => index + 1,
                SessionPhase::Completed => total_steps,
            },
            total_steps,
            percent: SessionProgress::percent_of(index, total_steps, phase),
            score: self.score(),
            elapsed_ms: self.elapsed_ms(now),
            is_complete: phase == SessionPhase::Completed,
        }
    }

    fn active_mut(&mut self) -> Result<&mut ActiveRun, SessionError> {
        match &mut self.state {
            State::Active(active) => Ok(active),
            State::NotStarted => Err(SessionError::NotStarted),
            State::Completed { .. } => Err(SessionError::Completed),
        }
    }

    fn inactive_error(&self) -> SessionError {
        match self.state {
            State::Completed { .. } => SessionError::Completed,
            _ => SessionError::NotStarted,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use qrlearn_core::defaults::{default_catalog, default_questions};
    use qrlearn_core::model::{AchievementId, QuestionDraft, QuestionId};
    use qrlearn_core::time::fixed_now;

    fn session() -> ScanSession {
        ScanSession::new(default_questions(), default_catalog())
    }

    const ANSWERS: [&str; 4] = ["START", "123", "MIDDLE", "FINISH"];

    fn play_through(session: &mut ScanSession, run: RunId) {
        for (index, answer) in ANSWERS.iter().enumerate() {
            session.submit_scan(run, answer).unwrap();
            if index + 1 < ANSWERS.len() {
                session.advance().unwrap();
            }
        }
    }

    fn earned(completed: &CompletedSession) -> Vec<AchievementId> {
        completed.achievements().iter().map(|a| a.id).collect()
    }

    #[test]
    fn lowercase_scan_scores_and_waits_for_advance() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();

        let result = session.submit_scan(run, "start").unwrap();
        assert!(result.is_correct);
        assert_eq!(result.points_awarded, 10);
        assert_eq!(result.expected_answer, "START");
        assert_eq!(result.next, NextStep::Advance);
        assert_eq!(session.score(), 10);
        assert_eq!(session.correct_answers(), 1);
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.current_step_index(), 0);

        assert_eq!(session.advance().unwrap(), 1);
        assert_eq!(session.current_step_index(), 1);
    }

    #[test]
    fn wrong_scan_counts_attempt_only() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();

        let result = session.submit_scan(run, "FINISH").unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.points_awarded, 0);
        assert_eq!(result.next, NextStep::Retry);
        assert!(!result.capture_suggested);
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.score(), 0);
        assert!(matches!(session.advance(), Err(SessionError::StepNotCleared)));
    }

    #[test]
    fn duplicate_correct_scan_is_rejected_without_scoring() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();
        session.submit_scan(run, "START").unwrap();

        let err = session.submit_scan(run, "START").unwrap_err();
        assert!(matches!(err, SessionError::StepAlreadyCleared));
        assert_eq!(session.score(), 10);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn calls_before_start_fail_fast() {
        let mut session = session();
        let run = RunId::generate();
        assert!(matches!(
            session.submit_scan(run, "START"),
            Err(SessionError::NotStarted)
        ));
        assert!(matches!(session.advance(), Err(SessionError::NotStarted)));
        assert!(matches!(
            session.complete(fixed_now()),
            Err(SessionError::NotStarted)
        ));
        assert!(session.record_hint_used().unwrap_err().is_invalid_transition());
    }

    #[test]
    fn empty_question_list_cannot_start() {
        let mut session = ScanSession::new(Vec::new(), default_catalog());
        assert!(matches!(session.start(fixed_now()), Err(SessionError::Empty)));
        assert_eq!(session.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn perfect_fast_run_earns_bonuses_once() {
        let mut session = session();
        let start = fixed_now();
        let run = session.start(start).unwrap();
        play_through(&mut session, run);

        assert!(matches!(session.advance(), Err(SessionError::LastStep)));
        let completed = session.complete(start + Duration::seconds(60)).unwrap();

        assert_eq!(
            earned(&completed),
            vec![
                AchievementId::FirstScan,
                AchievementId::PerfectRun,
                AchievementId::SpeedDemon
            ]
        );
        assert_eq!(completed.base_score(), 70);
        assert_eq!(completed.score(), 70 + 5 + 50 + 30);
        assert_eq!(session.score(), completed.score());
        assert_eq!(session.current_step_index(), 4);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn extra_attempt_and_slow_finish_lose_bonuses() {
        let mut session = session();
        let start = fixed_now();
        let run = session.start(start).unwrap();
        session.submit_scan(run, "nope").unwrap();
        play_through(&mut session, run);

        let completed = session
            .complete(start + Duration::milliseconds(120_001))
            .unwrap();
        assert_eq!(earned(&completed), vec![AchievementId::FirstScan]);
        assert_eq!(completed.attempts(), 5);
        assert_eq!(completed.correct_answers(), 4);
    }

    #[test]
    fn complete_requires_last_step_cleared() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();
        session.submit_scan(run, "START").unwrap();
        assert!(matches!(
            session.complete(fixed_now()),
            Err(SessionError::NotOnLastStep)
        ));

        for answer in &ANSWERS[1..] {
            session.advance().unwrap();
            session.submit_scan(run, answer).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::Active);
        session.complete(fixed_now()).unwrap();
    }

    #[test]
    fn scans_after_completion_are_rejected() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();
        play_through(&mut session, run);
        session.complete(fixed_now()).unwrap();

        assert!(matches!(
            session.submit_scan(run, "FINISH"),
            Err(SessionError::Completed)
        ));
        assert!(matches!(
            session.complete(fixed_now()),
            Err(SessionError::Completed)
        ));
    }

    #[test]
    fn reset_discards_run_and_rejects_stale_input() {
        let mut session = session();
        let old = session.start(fixed_now()).unwrap();
        session.submit_scan(old, "START").unwrap();
        session.record_hint_used().unwrap();

        let new = session.reset(fixed_now()).unwrap();
        assert_ne!(old, new);
        assert_eq!(session.score(), 0);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.hints_used(), 0);
        assert!(matches!(
            session.submit_scan(old, "START"),
            Err(SessionError::StaleRun)
        ));
        assert!(matches!(
            session.record_image_captured(old, fixed_now()),
            Err(SessionError::StaleRun)
        ));
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn reveal_hints_counts_only_when_hints_exist() {
        let plain = QuestionDraft::new("Scan A", "A")
            .validate()
            .unwrap()
            .assign(QuestionId::new("qa"), 1);
        let mut session = ScanSession::new(vec![plain], default_catalog());
        session.start(fixed_now()).unwrap();

        assert!(session.reveal_hints().unwrap().is_empty());
        assert_eq!(session.hints_used(), 0);
        assert_eq!(session.record_hint_used().unwrap(), 1);

        let mut seeded = self::session();
        seeded.start(fixed_now()).unwrap();
        assert_eq!(seeded.reveal_hints().unwrap().len(), 2);
        assert_eq!(seeded.hints_used(), 1);
    }

    #[test]
    fn five_images_earn_photographer() {
        let mut session = session();
        let start = fixed_now();
        let run = session.start(start).unwrap();
        for _ in 0..5 {
            session.record_image_captured(run, start).unwrap();
        }
        play_through(&mut session, run);

        let completed = session.complete(start + Duration::minutes(5)).unwrap();
        assert!(earned(&completed).contains(&AchievementId::Photographer));
        assert_eq!(completed.images_count(), 5);
        assert!(completed.captured_images().iter().all(|i| i.step_index == 0));
    }

    #[test]
    fn apply_reports_effects_in_order() {
        let mut session = session();
        let now = fixed_now();
        let effects = session.apply(SessionEvent::Start, now).unwrap();
        let [SessionEffect::Started { run }] = effects.as_slice() else {
            panic!("unexpected effects: {effects:?}");
        };
        let run = *run;

        let effects = session
            .apply(
                SessionEvent::Scan {
                    run,
                    text: " start ".into(),
                },
                now,
            )
            .unwrap();
        assert_eq!(effects.len(), 2);
        assert!(matches!(&effects[0], SessionEffect::ScanEvaluated(r) if r.is_correct));
        assert_eq!(effects[1], SessionEffect::SuggestCapture { step_index: 0 });

        let effects = session.apply(SessionEvent::Advance, now).unwrap();
        assert_eq!(effects, vec![SessionEffect::Advanced { step_index: 1 }]);

        assert!(session.apply(SessionEvent::Complete, now).is_err());
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn progress_tracks_steps_and_time() {
        let mut session = session();
        let start = fixed_now();
        assert_eq!(session.progress(start).current_step, 0);

        let run = session.start(start).unwrap();
        session.submit_scan(run, "START").unwrap();
        session.advance().unwrap();

        let progress = session.progress(start + Duration::seconds(75));
        assert_eq!(progress.current_step, 2);
        assert_eq!(progress.total_steps, 4);
        assert_eq!(progress.percent, 25);
        assert_eq!(progress.score, 10);
        assert_eq!(progress.elapsed_label(), "01:15");
        assert!(!progress.is_complete);
    }

    #[test]
    fn attempts_never_fall_below_correct_answers() {
        let mut session = session();
        let run = session.start(fixed_now()).unwrap();
        for text in ["x", "START", "y", "z"] {
            let _ = session.submit_scan(run, text);
            let _ = session.advance();
            assert!(session.attempts() >= session.correct_answers());
        }
    }
}
